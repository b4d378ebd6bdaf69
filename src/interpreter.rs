use crate::command::{CommandOutput, Context, ExecutionResult};
use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::external::{self, Launcher};
use crate::fs::Filesystem;
use crate::lexer::{join_tokens, split_into_tokens};
use crate::registry::{EXIT_COMMAND, Registry};
use crate::session::Session;
use crate::terminal::{Color, Terminal, paint};

/// Shown in the prompt when the working directory cannot be resolved.
const UNAVAILABLE_DIR: &str = "<unavailable>";

/// What one input line amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank line: nothing recorded, nothing run.
    Empty,
    /// `exit`: the session is over.
    Exit,
    Completed(ExecutionResult),
}

/// The interactive shell.
///
/// The shell owns the [`Session`], the command [`Registry`] and the
/// collaborators it talks to. Every line goes through the same path:
/// tokenize, record, route to a built-in or a whitelisted program, render.
///
/// Example
/// ```
/// use std::collections::HashMap;
/// use std::path::PathBuf;
/// use tinysh::{Config, Dispatch, MemoryFilesystem, RecordingLauncher, ScriptedTerminal, Session, Shell};
///
/// let session = Session::with_vars(HashMap::new(), PathBuf::from("/"));
/// let mut sh = Shell::new(
///     session,
///     Box::new(MemoryFilesystem::new()),
///     Box::new(RecordingLauncher::new()),
///     Box::new(ScriptedTerminal::new(Vec::<String>::new())),
///     Config::plain(),
/// )
/// .unwrap();
/// match sh.execute_line("mkdir docs") {
///     Dispatch::Completed(result) => assert_eq!(result.text(), "Directory 'docs' created."),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub struct Shell {
    session: Session,
    registry: Registry,
    fs: Box<dyn Filesystem>,
    launcher: Box<dyn Launcher>,
    terminal: Box<dyn Terminal>,
    config: Config,
}

impl Shell {
    /// Create a shell with every built-in command registered.
    pub fn new(
        session: Session,
        fs: Box<dyn Filesystem>,
        launcher: Box<dyn Launcher>,
        terminal: Box<dyn Terminal>,
        config: Config,
    ) -> Result<Self> {
        Ok(Self {
            session,
            registry: Registry::with_builtins()?,
            fs,
            launcher,
            terminal,
            config,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.fs.as_ref()
    }

    /// Run one line through the shell without prompting or rendering.
    pub fn execute_line(&mut self, line: &str) -> Dispatch {
        let tokens = split_into_tokens(line);
        let Some(name) = tokens.first() else {
            return Dispatch::Empty;
        };
        if name == EXIT_COMMAND {
            self.session.running = false;
            return Dispatch::Exit;
        }

        self.session.record(join_tokens(&tokens));
        log::debug!("dispatch {tokens:?}");
        Dispatch::Completed(self.route(&tokens))
    }

    fn route(&mut self, tokens: &[String]) -> ExecutionResult {
        let name = tokens[0].as_str();
        let mut ctx = Context {
            session: &mut self.session,
            fs: self.fs.as_mut(),
            launcher: self.launcher.as_ref(),
            config: &self.config,
            registry: &self.registry,
        };
        if let Some(cmd) = self.registry.lookup(name) {
            return cmd.execute(tokens, &mut ctx).into();
        }
        if let Some(alias) = external::find_alias(&self.config, name) {
            return external::execute(&alias, tokens, &mut ctx).into();
        }
        log::debug!("unrecognized command {name:?}");
        ExecutionResult::failure(&ShellError::Unrecognized {
            name: name.to_string(),
        })
    }

    /// Drive the read-dispatch-render loop until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        log::info!("session started for {}", self.session.username);
        self.terminal.set_title(&self.config.title)?;
        if self.config.clear_on_start {
            self.terminal.clear()?;
        }
        if self.config.banner {
            let banner = self.banner();
            self.terminal.print(&banner)?;
        }

        while self.session.running {
            let cue = self.prompt()?;
            let line = match self.terminal.read_line(&cue) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.terminal.print("\n")?;
                    self.session.running = false;
                    break;
                }
                Err(err) => {
                    log::error!("cannot read input: {err}");
                    self.session.running = false;
                    break;
                }
            };
            match self.execute_line(&line) {
                Dispatch::Empty => {}
                Dispatch::Exit => {
                    let bye = paint(self.config.color, Color::Green, "Goodbye!");
                    self.terminal.print(&format!("{bye}\n"))?;
                }
                Dispatch::Completed(result) => self.render(&result)?,
            }
        }
        log::info!(
            "session ended after {} commands",
            self.session.history().len()
        );
        Ok(())
    }

    fn banner(&self) -> String {
        let color = self.config.color;
        format!(
            "{}\n{}\n\n",
            paint(color, Color::Cyan, &format!("tinysh version {}", crate::VERSION)),
            paint(color, Color::Yellow, "Type '-help' for available commands.")
        )
    }

    /// Print the location line and return the input cue.
    fn prompt(&mut self) -> Result<String> {
        let location = match self.fs.current_dir() {
            Ok(dir) => {
                self.session.current_dir = dir;
                self.session.current_dir.display().to_string()
            }
            Err(err) => {
                log::warn!("cannot refresh working directory: {err}");
                UNAVAILABLE_DIR.to_string()
            }
        };
        let color = self.config.color;
        let label = paint(
            color,
            Color::Cyan,
            &format!("{}@tinysh", self.session.username),
        );
        let path = paint(color, Color::Yellow, &location);
        self.terminal.print(&format!("{label} {path}\n"))?;
        Ok(paint(color, Color::Green, ">>> "))
    }

    fn render(&mut self, result: &ExecutionResult) -> Result<()> {
        match &result.output {
            CommandOutput::Text(text) => {
                let body = indent(text);
                let body = if result.outcome.is_success() {
                    body
                } else {
                    paint(self.config.color, Color::Red, &body)
                };
                self.terminal.print(&format!("{body}\n"))
            }
            CommandOutput::Clear => self.terminal.clear(),
            CommandOutput::None => Ok(()),
        }
    }
}

/// Indents every non-empty line by two spaces.
fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
