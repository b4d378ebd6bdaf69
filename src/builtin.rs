use crate::command::{Command, CommandOutput, Context};
use crate::error::{Result, ShellError};
use crate::external;
use crate::fs::Filesystem;
use crate::registry::{EXIT_COMMAND, Registry};
use crate::session::HOME_VAR;
use crate::terminal::{Color, paint};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Register every built-in command into `registry`.
pub(crate) fn register_builtins(registry: &mut Registry) -> Result<()> {
    registry.register(Box::new(Ls))?;
    registry.register(Box::new(Cd))?;
    registry.register(Box::new(Cat))?;
    registry.register(Box::new(Mkdir))?;
    registry.register(Box::new(Rm))?;
    registry.register(Box::new(Rename))?;
    registry.register(Box::new(Move))?;
    registry.register(Box::new(Wd))?;
    registry.register(Box::new(Clear))?;
    registry.register(Box::new(Help))?;
    registry.register(Box::new(Version))?;
    registry.register(Box::new(History))?;
    Ok(())
}

/// Re-reads the working directory from the filesystem into the session.
pub(crate) fn refresh_current_dir(ctx: &mut Context<'_>) -> Result<PathBuf> {
    let dir = ctx.fs.current_dir()?;
    ctx.session.current_dir = dir.clone();
    Ok(dir)
}

/// List the entries of a directory.
pub struct Ls;

impl Command for Ls {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["dir", "list"]
    }

    fn usage(&self) -> &'static str {
        "ls [dir]"
    }

    fn description(&self) -> &'static str {
        "List directory contents"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let path = args.get(1).map_or(".", String::as_str);
        let entries = ctx.fs.list(Path::new(path)).map_err(|e| {
            log::warn!("ls {path}: {e}");
            ShellError::not_found(path, format!("Cannot access '{path}'"))
        })?;

        let color = ctx.config.color;
        let mut lines = vec![format!("Contents of {path}:"), "-".repeat(40)];
        for entry in entries {
            let marker = if entry.is_dir {
                paint(color, Color::Blue, "[DIR] ")
            } else {
                paint(color, Color::White, "[FILE]")
            };
            lines.push(format!("{marker} {}", entry.name));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

/// Change the working directory.
/// Without a target, changes to the directory named by the home variable.
pub struct Cd;

impl Command for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["change-dir"]
    }

    fn usage(&self) -> &'static str {
        "cd [dir]"
    }

    fn description(&self) -> &'static str {
        "Change directory (home when omitted)"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let target = match args.get(1) {
            Some(t) => PathBuf::from(t),
            None => ctx.session.home_dir().ok_or_else(|| ShellError::Environment {
                var: HOME_VAR.to_string(),
            })?,
        };

        ctx.fs.set_current_dir(&target).map_err(|e| {
            log::warn!("cd {}: {e}", target.display());
            ShellError::not_found(
                target.display().to_string(),
                format!("Cannot find directory '{}'", target.display()),
            )
        })?;
        let dir = refresh_current_dir(ctx)?;
        log::debug!("working directory is now {}", dir.display());
        Ok(CommandOutput::None)
    }
}

/// Print a file's contents.
pub struct Cat;

impl Command for Cat {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["type", "read-file"]
    }

    fn min_args(&self) -> usize {
        2
    }

    fn usage(&self) -> &'static str {
        "cat <file>"
    }

    fn description(&self) -> &'static str {
        "Display file contents"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let path = &args[1];
        let file = ctx.fs.open(Path::new(path)).map_err(|e| {
            log::warn!("cat {path}: {e}");
            ShellError::not_found(path.as_str(), format!("Cannot open file '{path}'"))
        })?;

        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| ShellError::failed(format!("Cannot read file '{path}': {e}")))?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

/// Create a directory.
pub struct Mkdir;

impl Command for Mkdir {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["make-dir"]
    }

    fn min_args(&self) -> usize {
        2
    }

    fn usage(&self) -> &'static str {
        "mkdir <directory>"
    }

    fn description(&self) -> &'static str {
        "Create a new directory"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let path = args[1].as_str();
        match ctx.fs.create_dir(Path::new(path)) {
            Ok(()) => Ok(CommandOutput::Text(format!("Directory '{path}' created."))),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(ShellError::conflict(
                path,
                format!("Directory '{path}' already exists."),
            )),
            Err(e) => {
                log::warn!("mkdir {path}: {e}");
                Err(ShellError::failed(format!(
                    "Cannot create directory '{path}'"
                )))
            }
        }
    }
}

/// Delete a file or an empty directory.
pub struct Rm;

impl Command for Rm {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["del", "delete", "remove"]
    }

    fn min_args(&self) -> usize {
        2
    }

    fn usage(&self) -> &'static str {
        "rm <file_or_folder>"
    }

    fn description(&self) -> &'static str {
        "Delete a file or an empty folder"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let target = args[1].as_str();
        let path = Path::new(target);
        if !ctx.fs.exists(path) {
            return Err(ShellError::not_found(target, format!("'{target}' not found.")));
        }

        if ctx.fs.is_dir(path) {
            match ctx.fs.remove_dir(path) {
                Ok(()) => Ok(CommandOutput::Text(format!("Directory '{target}' deleted."))),
                Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => Err(ShellError::conflict(
                    target,
                    format!("Cannot delete '{target}' (folder may not be empty)"),
                )),
                Err(e) => {
                    log::warn!("rm {target}: {e}");
                    Err(ShellError::failed(format!("Cannot delete '{target}'")))
                }
            }
        } else {
            match ctx.fs.remove_file(path) {
                Ok(()) => Ok(CommandOutput::Text(format!("File '{target}' deleted."))),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(ShellError::not_found(target, format!("'{target}' not found.")))
                }
                Err(e) => {
                    log::warn!("rm {target}: {e}");
                    Err(ShellError::failed(format!("Cannot delete '{target}'")))
                }
            }
        }
    }
}

/// Rename a path to exactly the given new path.
pub struct Rename;

impl Command for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ren"]
    }

    fn min_args(&self) -> usize {
        3
    }

    fn usage(&self) -> &'static str {
        "rename <old_name> <new_name>"
    }

    fn description(&self) -> &'static str {
        "Rename a file or folder"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let (old, new) = (args[1].as_str(), args[2].as_str());
        ctx.fs
            .rename(Path::new(old), Path::new(new))
            .map_err(|e| {
                log::warn!("rename {old} {new}: {e}");
                ShellError::failed(format!("Cannot rename '{old}'"))
            })?;
        Ok(CommandOutput::Text(format!("Renamed '{old}' to '{new}'")))
    }
}

/// Move a path, into `dest` when `dest` is an existing directory.
pub struct Move;

impl Command for Move {
    fn name(&self) -> &'static str {
        "move"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["mv"]
    }

    fn min_args(&self) -> usize {
        3
    }

    fn usage(&self) -> &'static str {
        "move <source> <destination>"
    }

    fn description(&self) -> &'static str {
        "Move a file or folder"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let source = args[1].as_str();
        let target = move_target(&*ctx.fs, source, &args[2]);
        ctx.fs.rename(Path::new(source), &target).map_err(|e| {
            log::warn!("move {source} {}: {e}", target.display());
            ShellError::failed(format!("Cannot move '{source}'"))
        })?;
        Ok(CommandOutput::Text(format!(
            "Moved '{source}' to '{}'",
            target.display()
        )))
    }
}

/// Final path of `source` when moved to `dest`.
///
/// An existing directory destination receives the source's base name;
/// anything else is taken literally.
pub fn move_target(fs: &dyn Filesystem, source: &str, dest: &str) -> PathBuf {
    let dest_path = Path::new(dest);
    if !fs.is_dir(dest_path) {
        return dest_path.to_path_buf();
    }
    match Path::new(source).file_name() {
        Some(base) => dest_path.join(base),
        None => dest_path.join(source),
    }
}

/// Print the current working directory.
pub struct Wd;

impl Command for Wd {
    fn name(&self) -> &'static str {
        "wd"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["pwd", "show-dir"]
    }

    fn usage(&self) -> &'static str {
        "wd"
    }

    fn description(&self) -> &'static str {
        "Show current working directory"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let dir = refresh_current_dir(ctx).map_err(|e| {
            log::warn!("wd: {e}");
            ShellError::failed("Cannot resolve the current directory")
        })?;
        Ok(CommandOutput::Text(dir.display().to_string()))
    }
}

pub struct Clear;

impl Command for Clear {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cls"]
    }

    fn usage(&self) -> &'static str {
        "clear"
    }

    fn description(&self) -> &'static str {
        "Clear the screen"
    }

    fn execute(&self, args: &[String], _ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        Ok(CommandOutput::Clear)
    }
}

/// Print the command reference.
pub struct Help;

impl Command for Help {
    fn name(&self) -> &'static str {
        "-help"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["help"]
    }

    fn usage(&self) -> &'static str {
        "-help"
    }

    fn description(&self) -> &'static str {
        "Show this help message"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let mut lines = vec!["Built-in Commands:".to_string(), "-".repeat(18)];
        for cmd in ctx.registry.commands() {
            let mut line = format!("{:<30} {}", cmd.usage(), cmd.description());
            if !cmd.aliases().is_empty() {
                line.push_str(&format!(" (aliases: {})", cmd.aliases().join(", ")));
            }
            lines.push(line);
        }

        lines.push(String::new());
        lines.push("External Programs:".to_string());
        lines.push("-".repeat(18));
        for alias in external::whitelist(ctx.config) {
            lines.push(format!(
                "{:<30} {} ({})",
                alias.usage, alias.description, alias.program
            ));
        }
        lines.push(format!("{EXIT_COMMAND:<30} Exit the shell"));
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

pub struct Version;

impl Command for Version {
    fn name(&self) -> &'static str {
        "-version"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["version"]
    }

    fn usage(&self) -> &'static str {
        "-version"
    }

    fn description(&self) -> &'static str {
        "Show shell version"
    }

    fn execute(&self, args: &[String], _ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        Ok(CommandOutput::Text(format!(
            "tinysh version {}\n{} edition\nBuilt with Rust",
            crate::VERSION,
            std::env::consts::OS
        )))
    }
}

/// Print the commands entered so far.
///
/// The invocation being executed is already the last history entry when the
/// handler runs; it is not listed.
pub struct History;

impl Command for History {
    fn name(&self) -> &'static str {
        "-history"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["history"]
    }

    fn usage(&self) -> &'static str {
        "-history"
    }

    fn description(&self) -> &'static str {
        "Show command history"
    }

    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<CommandOutput> {
        self.check_arity(args)?;
        let history = ctx.session.history();
        let previous = &history[..history.len().saturating_sub(1)];
        if previous.is_empty() {
            return Ok(CommandOutput::Text("No commands in history.".to_string()));
        }
        let mut lines = vec!["Command History:".to_string(), "-".repeat(16)];
        lines.extend(
            previous
                .iter()
                .enumerate()
                .map(|(i, cmd)| format!("{}. {cmd}", i + 1)),
        );
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Outcome;
    use crate::fs::{MemoryFilesystem, OsFilesystem};
    use crate::io_adapters::RecordingLauncher;
    use crate::session::Session;
    use crate::test_utils::{TestRig, lock_current_dir, make_unique_temp_dir};
    use std::collections::HashMap;
    use std::env as stdenv;
    use std::fs;

    fn outcome(res: Result<CommandOutput>) -> Outcome {
        match res {
            Ok(_) => Outcome::Success,
            Err(e) => e.outcome(),
        }
    }

    #[test]
    fn test_ls_marks_dirs_and_files() {
        let fs = MemoryFilesystem::new()
            .with_dir("/work/src")
            .with_file("/work/Cargo.toml", "[package]");
        let mut rig = TestRig::with_fs(fs);
        let text = rig.text("ls /work");
        assert_eq!(
            text,
            format!(
                "Contents of /work:\n{}\n[FILE] Cargo.toml\n[DIR]  src",
                "-".repeat(40)
            )
        );
    }

    #[test]
    fn test_ls_defaults_to_current_dir() {
        let mut fs = MemoryFilesystem::new().with_file("/home/a.txt", "");
        fs.set_current_dir(Path::new("/home")).unwrap();
        let mut rig = TestRig::with_fs(fs);
        let text = rig.text("dir");
        assert!(text.starts_with("Contents of .:"));
        assert!(text.ends_with("[FILE] a.txt"));
    }

    #[test]
    fn test_ls_colours_markers() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_dir("/d"));
        rig.config.color = true;
        let text = rig.text("ls /");
        assert!(text.contains("\x1b[34m[DIR] \x1b[0m d"));
    }

    #[test]
    fn test_ls_inaccessible_path() {
        let mut rig = TestRig::new();
        let err = rig.dispatch("ls /missing").unwrap_err();
        assert!(matches!(err, ShellError::NotFound { ref target, .. } if target == "/missing"));
        assert_eq!(format!("{err}"), "Cannot access '/missing'");
    }

    #[test]
    fn test_cd_updates_session_and_fs() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_dir("/projects/app"));
        assert_eq!(rig.dispatch("cd /projects").unwrap(), CommandOutput::None);
        rig.dispatch("cd app").unwrap();
        assert_eq!(rig.session.current_dir, PathBuf::from("/projects/app"));
        assert_eq!(rig.fs.current_dir().unwrap(), PathBuf::from("/projects/app"));
        rig.dispatch("cd ..").unwrap();
        assert_eq!(rig.session.current_dir, PathBuf::from("/projects"));
    }

    #[test]
    fn test_cd_to_home_when_none() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_dir("/home/alice"));
        rig.session.set_var(HOME_VAR, "/home/alice");
        rig.dispatch("cd").unwrap();
        assert_eq!(rig.session.current_dir, PathBuf::from("/home/alice"));
    }

    #[test]
    fn test_cd_without_home_is_environment_error() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_dir("/somewhere"));
        rig.dispatch("cd /somewhere").unwrap();
        let err = rig.dispatch("cd").unwrap_err();
        assert_eq!(err.outcome(), Outcome::Environment);
        assert_eq!(rig.session.current_dir, PathBuf::from("/somewhere"));
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_file("/file.txt", "x"));
        let err = rig.dispatch("cd nonexistentpath").unwrap_err();
        assert_eq!(err.outcome(), Outcome::NotFound);
        assert_eq!(format!("{err}"), "Cannot find directory 'nonexistentpath'");
        assert_eq!(outcome(rig.dispatch("cd file.txt")), Outcome::NotFound);
        assert_eq!(rig.session.current_dir, PathBuf::from("/"));
        assert_eq!(rig.text("wd"), "/");
    }

    #[test]
    fn test_cat_streams_all_lines() {
        let fs = MemoryFilesystem::new().with_file("/notes.txt", "hello\r\nworld\n\nlast");
        let mut rig = TestRig::with_fs(fs);
        assert_eq!(rig.text("cat /notes.txt"), "hello\nworld\n\nlast");
        assert_eq!(rig.text("type notes.txt"), "hello\nworld\n\nlast");
    }

    #[test]
    fn test_cat_replaces_invalid_utf8() {
        let fs = MemoryFilesystem::new().with_file("/bin.dat", b"f\xffo");
        let mut rig = TestRig::with_fs(fs);
        assert_eq!(rig.text("cat bin.dat"), "f\u{fffd}o");
    }

    #[test]
    fn test_cat_open_failure() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_dir("/d"));
        assert_eq!(outcome(rig.dispatch("cat missing.txt")), Outcome::NotFound);
        assert_eq!(outcome(rig.dispatch("cat d")), Outcome::NotFound);
    }

    #[test]
    fn test_mkdir_twice_conflicts() {
        let mut rig = TestRig::new();
        assert_eq!(rig.text("mkdir testdir"), "Directory 'testdir' created.");
        let err = rig.dispatch("mkdir testdir").unwrap_err();
        assert!(matches!(err, ShellError::Conflict { .. }));
        assert_eq!(format!("{err}"), "Directory 'testdir' already exists.");
        assert_eq!(rig.fs.list(Path::new("/")).unwrap().len(), 1);
    }

    #[test]
    fn test_mkdir_without_parent_fails_generically() {
        let mut rig = TestRig::new();
        let err = rig.dispatch("mkdir a/b").unwrap_err();
        assert_eq!(err.outcome(), Outcome::Failed);
        assert_eq!(format!("{err}"), "Cannot create directory 'a/b'");
    }

    #[test]
    fn test_short_invocations_are_usage_errors_without_mutation() {
        let fs = MemoryFilesystem::new()
            .with_file("/keep.txt", "x")
            .with_dir("/folder");
        let mut rig = TestRig::with_fs(fs);
        for (line, usage) in [
            ("mkdir", "mkdir <directory>"),
            ("cat", "cat <file>"),
            ("rm", "rm <file_or_folder>"),
            ("del", "rm <file_or_folder>"),
            ("rename keep.txt", "rename <old_name> <new_name>"),
            ("move keep.txt", "move <source> <destination>"),
            ("mv", "move <source> <destination>"),
        ] {
            match rig.dispatch(line) {
                Err(ShellError::Usage { usage: got }) => assert_eq!(got, usage, "{line}"),
                other => panic!("{line}: expected usage error, got {other:?}"),
            }
        }
        let names: Vec<String> = rig
            .fs
            .list(Path::new("/"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["folder", "keep.txt"]);
        assert!(rig.fs.list(Path::new("/folder")).unwrap().is_empty());
    }

    #[test]
    fn test_rm_file_and_empty_dir() {
        let fs = MemoryFilesystem::new()
            .with_file("/a.txt", "a")
            .with_dir("/empty");
        let mut rig = TestRig::with_fs(fs);
        assert_eq!(rig.text("rm a.txt"), "File 'a.txt' deleted.");
        assert_eq!(rig.text("delete empty"), "Directory 'empty' deleted.");
        assert!(rig.fs.list(Path::new("/")).unwrap().is_empty());
    }

    #[test]
    fn test_rm_missing_and_nonempty_are_distinct() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_file("/full/x", "x"));
        let missing = rig.dispatch("rm ghost").unwrap_err();
        let busy = rig.dispatch("rm full").unwrap_err();
        assert_eq!(missing.outcome(), Outcome::NotFound);
        assert_eq!(format!("{missing}"), "'ghost' not found.");
        assert_eq!(busy.outcome(), Outcome::Conflict);
        assert_eq!(format!("{busy}"), "Cannot delete 'full' (folder may not be empty)");
        assert!(rig.fs.exists(Path::new("/full/x")));
    }

    #[test]
    fn test_rename_is_literal() {
        let fs = MemoryFilesystem::new()
            .with_file("/old.txt", "x")
            .with_dir("/folder");
        let mut rig = TestRig::with_fs(fs);
        assert_eq!(rig.text("ren old.txt new.txt"), "Renamed 'old.txt' to 'new.txt'");
        assert!(rig.fs.exists(Path::new("/new.txt")));

        // No directory-target inference: a file cannot replace a directory.
        let err = rig.dispatch("rename new.txt folder").unwrap_err();
        assert_eq!(format!("{err}"), "Cannot rename 'new.txt'");
        assert!(rig.fs.exists(Path::new("/new.txt")));
        assert!(!rig.fs.exists(Path::new("/folder/new.txt")));
    }

    #[test]
    fn test_move_into_existing_directory() {
        let fs = MemoryFilesystem::new()
            .with_file("/a.txt", "payload")
            .with_dir("/folder");
        let mut rig = TestRig::with_fs(fs);
        assert_eq!(rig.text("move a.txt folder/"), "Moved 'a.txt' to 'folder/a.txt'");
        assert!(!rig.fs.exists(Path::new("/a.txt")));
        assert!(rig.fs.exists(Path::new("/folder/a.txt")));
    }

    #[test]
    fn test_move_to_non_directory_is_literal() {
        let mut rig = TestRig::with_fs(MemoryFilesystem::new().with_file("/a.txt", "x"));
        assert_eq!(rig.text("mv a.txt b.txt"), "Moved 'a.txt' to 'b.txt'");
        assert!(rig.fs.exists(Path::new("/b.txt")));
        assert_eq!(outcome(rig.dispatch("mv ghost b2.txt")), Outcome::Failed);
    }

    #[test]
    fn test_move_target_uses_base_name() {
        let fs = MemoryFilesystem::new()
            .with_file("/src/deep/report.txt", "r")
            .with_dir("/dest");
        assert_eq!(
            move_target(&fs, "src/deep/report.txt", "dest"),
            Path::new("dest").join("report.txt")
        );
        assert_eq!(
            move_target(&fs, "src/deep/report.txt", "elsewhere.txt"),
            PathBuf::from("elsewhere.txt")
        );
    }

    #[test]
    fn test_wd_and_clear() {
        let mut fs = MemoryFilesystem::new().with_dir("/x/y");
        fs.set_current_dir(Path::new("/x/y")).unwrap();
        let mut rig = TestRig::with_fs(fs);
        assert_eq!(rig.text("pwd"), "/x/y");
        assert_eq!(rig.text("show-dir"), "/x/y");
        assert_eq!(rig.dispatch("cls").unwrap(), CommandOutput::Clear);
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut rig = TestRig::new();
        let text = rig.text("help");
        for usage in [
            "ls [dir]",
            "cd [dir]",
            "cat <file>",
            "mkdir <directory>",
            "rm <file_or_folder>",
            "rename <old_name> <new_name>",
            "move <source> <destination>",
            "wd",
            "clear",
            "-help",
            "-version",
            "-history",
            "notepad [file]",
            "code [path]",
            "exit",
        ] {
            assert!(text.contains(usage), "help is missing {usage}");
        }
        assert!(text.contains("(aliases: del, delete, remove)"));
    }

    #[test]
    fn test_version_is_static() {
        let mut rig = TestRig::new();
        let text = rig.text("-version");
        assert!(text.starts_with(&format!("tinysh version {}\n", crate::VERSION)));
        assert_eq!(text, rig.text("version"));
    }

    #[test]
    fn test_history_is_one_indexed_and_excludes_itself() {
        let mut rig = TestRig::new();
        assert_eq!(rig.text("history"), "No commands in history.");
        rig.dispatch("mkdir   a").unwrap();
        rig.dispatch("ls").unwrap();
        assert_eq!(
            rig.text("-history"),
            format!(
                "Command History:\n{}\n1. history\n2. mkdir a\n3. ls",
                "-".repeat(16)
            )
        );
    }

    #[test]
    fn test_cd_to_absolute_path_on_os_filesystem() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("builtin_cd").expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");

        // save original cwd to restore later
        let orig = stdenv::current_dir().unwrap();

        let mut session = Session::with_vars(HashMap::new(), orig.clone());
        let mut osfs = OsFilesystem;
        let launcher = RecordingLauncher::new();
        let config = crate::config::Config::plain();
        let registry = Registry::with_builtins().unwrap();
        let mut ctx = Context {
            session: &mut session,
            fs: &mut osfs,
            launcher: &launcher,
            config: &config,
            registry: &registry,
        };

        let args = vec!["cd".to_string(), canonical_temp.to_string_lossy().to_string()];
        let res = Cd.execute(&args, &mut ctx);
        let bad = Cd.execute(
            &["cd".to_string(), "nonexistent_dir_for_tinysh_test".to_string()],
            &mut ctx,
        );
        let new_cwd = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");

        assert!(res.is_ok());
        assert!(bad.is_err());
        assert_eq!(fs::canonicalize(new_cwd).unwrap(), canonical_temp);
        assert_eq!(fs::canonicalize(&session.current_dir).unwrap(), canonical_temp);

        let _ = fs::remove_dir_all(&temp);
    }
}
