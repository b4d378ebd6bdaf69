//! Lexical analysis of a single input line.
//!
//! The command surface has no quoting, escaping or substitution, so a line is
//! just a sequence of whitespace-separated words. A path containing a space
//! cannot be expressed as one token.

/// Splits `line` into its whitespace-separated tokens.
///
/// Leading and trailing whitespace is ignored and runs of whitespace count as
/// a single separator. Blank input yields an empty vector.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Rebuilds an invocation from its tokens, separated by single spaces.
///
/// This is the form recorded in the session history; the original spacing of
/// the line is not preserved.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}
