use crate::command::{CommandOutput, Context};
use crate::config::Config;
use crate::error::{Result, ShellError};
use std::borrow::Cow;
use std::env as stdenv;
use std::ffi::OsStr;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Starts external programs on behalf of the shell.
pub trait Launcher {
    /// Requests a detached launch of `program` with an optional argument.
    ///
    /// Returns once the request is accepted; the program's lifetime and
    /// output are not observed.
    fn launch(&self, program: &str, arg: Option<&str>) -> io::Result<()>;
}

/// Launcher that spawns a child process and never waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpawnLauncher;

impl Launcher for SpawnLauncher {
    fn launch(&self, program: &str, arg: Option<&str>) -> io::Result<()> {
        // Editor settings like "code --wait" carry their own arguments.
        let mut words = program.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "empty program name"))?;
        let search_paths = stdenv::var_os("PATH").unwrap_or_default();
        let executable = find_command_path(&search_paths, Path::new(name)).ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, format!("{name}: command not found"))
        })?;

        // Never waited on; on Unix the child stays a zombie until the shell exits.
        let child = Command::new(executable.as_ref())
            .args(words)
            .args(arg.filter(|a| !a.is_empty()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        log::debug!("launched {} (pid {})", executable.display(), child.id());
        Ok(())
    }
}

/// Argument passed when the user gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultArg {
    None,
    CurrentDir,
}

/// A whitelisted name that launches an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalAlias {
    pub name: &'static str,
    /// Human name used in the confirmation message.
    pub label: &'static str,
    pub program: String,
    pub default_arg: DefaultArg,
    pub usage: &'static str,
    pub description: &'static str,
}

/// The fixed set of external aliases, with programs taken from `config`.
pub fn whitelist(config: &Config) -> Vec<ExternalAlias> {
    vec![
        ExternalAlias {
            name: "notepad",
            label: "Notepad",
            program: config.editor.clone(),
            default_arg: DefaultArg::None,
            usage: "notepad [file]",
            description: "Open the text editor",
        },
        ExternalAlias {
            name: "code",
            label: "VS Code",
            program: config.code_editor.clone(),
            default_arg: DefaultArg::CurrentDir,
            usage: "code [path]",
            description: "Open the code editor",
        },
    ]
}

/// Looks `name` up in the whitelist.
pub fn find_alias(config: &Config, name: &str) -> Option<ExternalAlias> {
    whitelist(config).into_iter().find(|alias| alias.name == name)
}

/// Runs a whitelisted alias: resolve the argument, request the launch.
pub fn execute(alias: &ExternalAlias, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
    let arg = match args.get(1) {
        Some(arg) => Some(arg.clone()),
        None => match alias.default_arg {
            DefaultArg::None => None,
            DefaultArg::CurrentDir => Some(ctx.session.current_dir.display().to_string()),
        },
    };
    log::debug!("launch request: {} {:?}", alias.program, arg);
    ctx.launcher
        .launch(&alias.program, arg.as_deref())
        .map_err(|e| {
            log::warn!("{}: launch of '{}' failed: {e}", alias.name, alias.program);
            ShellError::failed(format!("Cannot launch '{}'", alias.program))
        })?;
    Ok(CommandOutput::Text(format!("{} opened.", alias.label)))
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        // Empty path -> not found
        (None, None) => None,
        // Single component -> search in PATH
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        // Multiple components -> search in current dir
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in stdenv::split_paths(search_paths) {
        for candidate in candidates(&dir, cmd) {
            if find_by_path(&candidate).is_some() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(windows)]
fn candidates(dir: &Path, cmd: &OsStr) -> Vec<PathBuf> {
    let base = dir.join(cmd);
    let mut out = vec![base.clone()];
    for ext in ["exe", "cmd", "bat"] {
        out.push(base.with_extension(ext));
    }
    out
}

#[cfg(not(windows))]
fn candidates(dir: &Path, cmd: &OsStr) -> Vec<PathBuf> {
    vec![dir.join(cmd)]
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
