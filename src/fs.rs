//! Filesystem capabilities used by the built-in commands.
//!
//! [`OsFilesystem`] talks to the real filesystem and process working
//! directory. [`MemoryFilesystem`] keeps a whole tree in memory and is used
//! to drive the shell in tests without touching the disk.

use std::collections::BTreeMap;
use std::env as stdenv;
use std::fs;
use std::io::{self, Cursor, ErrorKind, Read};
use std::path::{Component, Path, PathBuf};

/// A single entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Operations the shell needs from a filesystem.
///
/// Relative paths are resolved against [`Filesystem::current_dir`].
/// Errors carry the standard [`ErrorKind`] so callers can tell a missing
/// target from an occupied or non-empty one.
pub trait Filesystem {
    /// Entries of the directory at `path`, sorted by name, without `.` and `..`.
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    /// Opens a file for streaming reads.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Creates a single directory; the parent must already exist.
    fn create_dir(&mut self, path: &Path) -> io::Result<()>;

    /// Removes an empty directory.
    fn remove_dir(&mut self, path: &Path) -> io::Result<()>;

    fn remove_file(&mut self, path: &Path) -> io::Result<()>;

    /// Renames `from` to exactly `to`.
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()>;

    fn current_dir(&self) -> io::Result<PathBuf>;

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()>;
}

/// The real filesystem of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // Follow symlinks so a link to a directory is listed as one.
            let is_dir = fs::metadata(entry.path())
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            entries.push(DirEntry::new(
                entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            ));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        if path.is_dir() {
            return Err(io::Error::new(ErrorKind::IsADirectory, "is a directory"));
        }
        Ok(Box::new(fs::File::open(path)?))
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        stdenv::current_dir()
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        stdenv::set_current_dir(path)
    }
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// A fully in-memory filesystem rooted at `/`.
///
/// Keys of the node map are normalized absolute paths, so `..` and `.` are
/// resolved lexically before every lookup.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    nodes: BTreeMap<PathBuf, Node>,
    cwd: PathBuf,
}

impl MemoryFilesystem {
    /// Create a filesystem containing only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes,
            cwd: PathBuf::from("/"),
        }
    }

    /// Create `path` and any missing parents.
    pub fn create_dir_all(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = self.resolve(path.as_ref());
        let mut current = PathBuf::from("/");
        for component in path.components().skip(1) {
            current.push(component);
            match self.nodes.get(&current) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(not_a_directory(&current)),
                None => {
                    self.nodes.insert(current.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    /// Write `data` to a file, replacing any previous content.
    pub fn write(&mut self, path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> io::Result<()> {
        let path = self.resolve(path.as_ref());
        self.require_parent_dir(&path)?;
        if let Some(Node::Dir) = self.nodes.get(&path) {
            return Err(is_a_directory(&path));
        }
        self.nodes.insert(path, Node::File(data.as_ref().to_vec()));
        Ok(())
    }

    /// Builder form of [`MemoryFilesystem::write`] for test fixtures.
    ///
    /// Panics if the fixture path cannot be created.
    pub fn with_file(mut self, path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).expect("fixture path");
        }
        self.write(path, data).expect("fixture path");
        self
    }

    /// Builder form of [`MemoryFilesystem::create_dir_all`] for test fixtures.
    ///
    /// Panics if the fixture path cannot be created.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path).expect("fixture path");
        self
    }

    /// Resolve `path` against the current directory into a normalized
    /// absolute path.
    fn resolve(&self, path: &Path) -> PathBuf {
        let mut resolved = if path.has_root() {
            PathBuf::from("/")
        } else {
            self.cwd.clone()
        };
        for component in path.components() {
            match component {
                Component::Normal(name) => resolved.push(name),
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        resolved
    }

    fn children<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = (&'a PathBuf, &'a Node)> {
        self.nodes
            .iter()
            .filter(move |(key, _)| key.parent() == Some(dir))
    }

    fn require_parent_dir(&self, path: &Path) -> io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("/"));
        match self.nodes.get(parent) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(not_a_directory(parent)),
            None => Err(not_found(parent)),
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotADirectory,
        format!("not a directory: {}", path.display()),
    )
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::IsADirectory,
        format!("is a directory: {}", path.display()),
    )
}

impl Filesystem for MemoryFilesystem {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let dir = self.resolve(path);
        match self.nodes.get(&dir) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(not_a_directory(&dir)),
            None => return Err(not_found(&dir)),
        }
        // BTreeMap order keeps siblings sorted by name.
        Ok(self
            .children(&dir)
            .filter_map(|(key, node)| {
                let name = key.file_name()?.to_string_lossy().into_owned();
                Some(DirEntry::new(name, matches!(node, Node::Dir)))
            })
            .collect())
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(&self.resolve(path)), Some(Node::Dir))
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(&self.resolve(path))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let path = self.resolve(path);
        match self.nodes.get(&path) {
            Some(Node::File(data)) => Ok(Box::new(Cursor::new(data.clone()))),
            Some(Node::Dir) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        let path = self.resolve(path);
        if self.nodes.contains_key(&path) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("already exists: {}", path.display()),
            ));
        }
        self.require_parent_dir(&path)?;
        self.nodes.insert(path, Node::Dir);
        Ok(())
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        let path = self.resolve(path);
        if path == Path::new("/") {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                "cannot remove root",
            ));
        }
        match self.nodes.get(&path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(not_a_directory(&path)),
            None => return Err(not_found(&path)),
        }
        if self.children(&path).next().is_some() {
            return Err(io::Error::new(
                ErrorKind::DirectoryNotEmpty,
                format!("directory not empty: {}", path.display()),
            ));
        }
        self.nodes.remove(&path);
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        let path = self.resolve(path);
        match self.nodes.get(&path) {
            Some(Node::File(_)) => {
                self.nodes.remove(&path);
                Ok(())
            }
            Some(Node::Dir) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        let from = self.resolve(from);
        let to = self.resolve(to);
        let source_is_dir = match self.nodes.get(&from) {
            Some(node) => matches!(node, Node::Dir),
            None => return Err(not_found(&from)),
        };
        if from == to {
            return Ok(());
        }
        if from == Path::new("/") || to.starts_with(&from) {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot move {} into itself", from.display()),
            ));
        }
        self.require_parent_dir(&to)?;
        match self.nodes.get(&to) {
            Some(Node::Dir) if !source_is_dir => return Err(is_a_directory(&to)),
            Some(Node::Dir) if self.children(&to).next().is_some() => {
                return Err(io::Error::new(
                    ErrorKind::DirectoryNotEmpty,
                    format!("directory not empty: {}", to.display()),
                ));
            }
            Some(Node::File(_)) if source_is_dir => return Err(not_a_directory(&to)),
            _ => {}
        }

        let moved: Vec<PathBuf> = self
            .nodes
            .keys()
            .filter(|key| key.starts_with(&from))
            .cloned()
            .collect();
        for old in moved {
            if let Some(node) = self.nodes.remove(&old) {
                let suffix = old.strip_prefix(&from).unwrap_or_else(|_| Path::new(""));
                let new = if suffix.as_os_str().is_empty() {
                    to.clone()
                } else {
                    to.join(suffix)
                };
                self.nodes.insert(new, node);
            }
        }
        if self.cwd.starts_with(&from) {
            let suffix = self.cwd.strip_prefix(&from).unwrap_or_else(|_| Path::new(""));
            self.cwd = to.join(suffix);
        }
        Ok(())
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        let path = self.resolve(path);
        match self.nodes.get(&path) {
            Some(Node::Dir) => {
                self.cwd = path;
                Ok(())
            }
            Some(Node::File(_)) => Err(not_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }
}
