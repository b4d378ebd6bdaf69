//! Helpers shared by the unit tests of several modules.

use std::collections::HashMap;
use std::env as stdenv;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::command::{CommandOutput, Context};
use crate::config::Config;
use crate::error::Result;
use crate::fs::{Filesystem, MemoryFilesystem};
use crate::io_adapters::RecordingLauncher;
use crate::lexer::{join_tokens, split_into_tokens};
use crate::registry::Registry;
use crate::session::Session;

/// Serializes tests that read or change the process working directory.
pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Creates a fresh directory under the system temp dir.
pub(crate) fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
    let mut p = stdenv::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    p.push(format!("tinysh_test_{}_{}_{}", tag, std::process::id(), nanos));
    fs::create_dir_all(&p)?;
    Ok(p)
}

/// In-memory collaborators for calling handlers directly.
pub(crate) struct TestRig {
    pub session: Session,
    pub fs: MemoryFilesystem,
    pub launcher: RecordingLauncher,
    pub config: Config,
    pub registry: Registry,
}

impl TestRig {
    pub fn new() -> Self {
        Self::with_fs(MemoryFilesystem::new())
    }

    pub fn with_fs(fs: MemoryFilesystem) -> Self {
        let cwd = fs.current_dir().unwrap();
        Self {
            session: Session::with_vars(HashMap::new(), cwd),
            fs,
            launcher: RecordingLauncher::new(),
            config: Config::plain(),
            registry: Registry::with_builtins().unwrap(),
        }
    }

    pub fn ctx(&mut self) -> Context<'_> {
        Context {
            session: &mut self.session,
            fs: &mut self.fs,
            launcher: &self.launcher,
            config: &self.config,
            registry: &self.registry,
        }
    }

    /// Records `line` in the history and runs the registered handler, the
    /// way the dispatch loop does.
    pub fn dispatch(&mut self, line: &str) -> Result<CommandOutput> {
        let tokens = split_into_tokens(line);
        let cmd = self
            .registry
            .lookup(&tokens[0])
            .unwrap_or_else(|| panic!("no built-in named {}", tokens[0]));
        self.session.record(join_tokens(&tokens));
        let mut ctx = Context {
            session: &mut self.session,
            fs: &mut self.fs,
            launcher: &self.launcher,
            config: &self.config,
            registry: &self.registry,
        };
        cmd.execute(&tokens, &mut ctx)
    }

    /// Text of a successful dispatch.
    pub fn text(&mut self, line: &str) -> String {
        match self.dispatch(line) {
            Ok(CommandOutput::Text(text)) => text,
            other => panic!("{line}: expected text output, got {other:?}"),
        }
    }
}
