//! A small interactive shell for everyday file chores.
//!
//! The crate reads one line at a time, splits it into words and runs either a
//! built-in command (listing, navigation, file and folder management) or one
//! of a few whitelisted external programs. Each part the shell depends on
//! sits behind a trait: [`Filesystem`] for disk access, [`Launcher`] for
//! starting programs and [`Terminal`] for input and output. That lets the
//! whole loop run against in-memory stand-ins.
//!
//! The main entry point is [`Shell`], which owns the [`Session`] and drives
//! the prompt loop. [`Shell::execute_line`] runs a single line and returns
//! its [`ExecutionResult`] without touching the terminal.

mod builtin;
pub mod command;
pub mod config;
pub mod error;
pub mod external;
pub mod fs;
mod interpreter;
pub mod io_adapters;
mod lexer;
pub mod registry;
pub mod session;
pub mod terminal;

#[cfg(test)]
mod test_utils;

pub use command::{CommandOutput, ExecutionResult, Outcome};
pub use config::Config;
pub use error::{Result, ShellError};
pub use external::{Launcher, SpawnLauncher};
pub use fs::{Filesystem, MemoryFilesystem, OsFilesystem};
pub use interpreter::{Dispatch, Shell};
pub use io_adapters::{RecordingLauncher, ScriptedTerminal};
pub use session::Session;
pub use terminal::{RustylineTerminal, Terminal};

/// Version reported by `-version` and the startup banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
