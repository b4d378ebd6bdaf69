use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::external::Launcher;
use crate::fs::Filesystem;
use crate::registry::Registry;
use crate::session::Session;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Text to display, one entry per line.
    Text(String),
    /// Signal to clear the visible terminal output.
    Clear,
    /// Command produced no visible output.
    None,
}

/// Classification of a finished invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    UsageError,
    NotFound,
    Conflict,
    Unrecognized,
    Environment,
    /// The command was recognized but its operation failed.
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

/// Result of one invocation, rendered immediately by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub outcome: Outcome,
    pub output: CommandOutput,
}

impl ExecutionResult {
    pub fn success(output: CommandOutput) -> Self {
        Self {
            outcome: Outcome::Success,
            output,
        }
    }

    /// Turns a handler error into its display form.
    pub fn failure(err: &ShellError) -> Self {
        let text = match err {
            ShellError::Usage { usage } => format!("Usage: {usage}"),
            ShellError::Unrecognized { .. } => {
                format!("{err}\nType '-help' for available commands.")
            }
            _ => format!("Error: {err}"),
        };
        Self {
            outcome: err.outcome(),
            output: CommandOutput::Text(text),
        }
    }

    /// Text of the output, or an empty string for signal outputs.
    pub fn text(&self) -> &str {
        match &self.output {
            CommandOutput::Text(text) => text,
            CommandOutput::Clear | CommandOutput::None => "",
        }
    }
}

impl From<Result<CommandOutput>> for ExecutionResult {
    fn from(result: Result<CommandOutput>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Everything a handler may touch during one call.
///
/// Borrowed from the shell for the duration of the call only.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub fs: &'a mut dyn Filesystem,
    pub launcher: &'a dyn Launcher,
    pub config: &'a Config,
    pub registry: &'a Registry,
}

/// Object-safe trait for any built-in command known to the shell.
pub trait Command {
    /// Canonical name of the command, e.g. "ls" or "cd".
    fn name(&self) -> &'static str;

    /// Alternate names resolving to this command.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Minimum number of tokens, the name included.
    fn min_args(&self) -> usize {
        1
    }

    /// Usage line, e.g. "mkdir <directory>".
    fn usage(&self) -> &'static str;

    /// One-line description for the help listing.
    fn description(&self) -> &'static str;

    /// Executes the command. `args[0]` is the name the user typed.
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput>;

    /// Fails with a usage error when `args` is shorter than [`Command::min_args`].
    fn check_arity(&self, args: &[String]) -> Result<()> {
        if args.len() < self.min_args() {
            return Err(ShellError::Usage {
                usage: self.usage().to_string(),
            });
        }
        Ok(())
    }
}
