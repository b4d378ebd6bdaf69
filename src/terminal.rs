//! Terminal/display layer: line input, text output, screen control.

use std::io::{self, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::Result;

const RESET: &str = "\x1b[0m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Foreground colours used by the prompt and command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    White,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Cyan => "\x1b[36m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Wraps `text` in the colour's escape sequence when `enabled`.
pub fn paint(enabled: bool, color: Color, text: &str) -> String {
    if enabled {
        format!("{}{text}{RESET}", color.code())
    } else {
        text.to_string()
    }
}

/// Interactive input and output used by the dispatch loop.
pub trait Terminal {
    /// Reads one line after showing `prompt`.
    ///
    /// Returns `Ok(None)` at end of input. An interrupted read (Ctrl-C)
    /// yields an empty line.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Writes `text` as-is.
    fn print(&mut self, text: &str) -> Result<()>;

    /// Clears the visible output.
    fn clear(&mut self) -> Result<()>;

    fn set_title(&mut self, title: &str) -> Result<()>;
}

/// Terminal backed by a rustyline editor on stdin/stdout.
///
/// Entered lines are kept in the editor's in-memory recall list so the arrow
/// keys work; nothing is written to disk.
pub struct RustylineTerminal {
    editor: DefaultEditor,
    out: io::Stdout,
}

impl RustylineTerminal {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            out: io::stdout(),
        })
    }
}

impl Terminal for RustylineTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.print(CLEAR_SCREEN)
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.print(&format!("\x1b]0;{title}\x07"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_wraps_when_enabled() {
        assert_eq!(paint(true, Color::Red, "x"), "\x1b[31mx\x1b[0m");
        assert_eq!(paint(false, Color::Red, "x"), "x");
    }
}
