use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::rc::Rc;

use crate::error::Result;
use crate::external::Launcher;
use crate::terminal::Terminal;

/// Everything a [`ScriptedTerminal`] was asked to display.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// Printed text, prompts included, in order.
    pub output: String,
    pub clears: usize,
    pub titles: Vec<String>,
}

/// Memory-backed terminal that replays a fixed list of input lines.
///
/// Reading past the last line reports end of input.
pub struct ScriptedTerminal {
    input: VecDeque<String>,
    transcript: Rc<RefCell<Transcript>>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: Rc::new(RefCell::new(Transcript::default())),
        }
    }

    /// Convenience: create terminal and return (terminal, rc_handle).
    pub fn with_handle<I, S>(lines: I) -> (Self, Rc<RefCell<Transcript>>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let term = Self::new(lines);
        let rc = term.transcript.clone();
        (term, rc)
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.transcript.borrow_mut().output.push_str(prompt);
        Ok(self.input.pop_front())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.transcript.borrow_mut().output.push_str(text);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.transcript.borrow_mut().clears += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.transcript.borrow_mut().titles.push(title.to_string());
        Ok(())
    }
}

/// Launcher that only records what it was asked to start.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    requests: RefCell<Vec<(String, Option<String>)>>,
    reject: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose every request fails as if the program were missing.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// Accepted requests as `(program, argument)` pairs.
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, program: &str, arg: Option<&str>) -> io::Result<()> {
        if self.reject {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("{program}: command not found"),
            ));
        }
        self.requests
            .borrow_mut()
            .push((program.to_string(), arg.map(str::to_string)));
        Ok(())
    }
}

/// Launcher shared between a shell and the test that inspects it.
impl Launcher for Rc<RecordingLauncher> {
    fn launch(&self, program: &str, arg: Option<&str>) -> io::Result<()> {
        self.as_ref().launch(program, arg)
    }
}
