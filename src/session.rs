use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Name of the variable holding the user's home directory.
#[cfg(windows)]
pub const HOME_VAR: &str = "USERPROFILE";
#[cfg(not(windows))]
pub const HOME_VAR: &str = "HOME";

/// Mutable state of one interactive session.
///
/// The session contains:
/// - `vars`: a snapshot of the environment used for home and user lookup.
/// - `current_dir`: the working directory shown in the prompt.
/// - `username`: resolved once when the session starts.
/// - `history`: every recorded invocation, in entry order.
/// - `running`: cleared when the loop should stop.
#[derive(Debug, Clone)]
pub struct Session {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub username: String,
    history: Vec<String>,
    pub running: bool,
}

impl Session {
    /// Capture the current process state into a new session.
    pub fn new() -> Self {
        // Variables that are not valid Unicode are left out of the snapshot.
        let vars: HashMap<String, String> = stdenv::vars_os()
            .filter_map(|(key, val)| Some((key.into_string().ok()?, val.into_string().ok()?)))
            .collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_vars(vars, current_dir)
    }

    /// Build a session from an explicit variable map and starting directory.
    pub fn with_vars(vars: HashMap<String, String>, current_dir: PathBuf) -> Self {
        let username = resolve_username(&vars);
        Self {
            vars,
            current_dir,
            username,
            history: Vec::new(),
            running: true,
        }
    }

    /// Get the value of a variable from the session snapshot.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable in the session snapshot.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Home directory, if the home variable is set and non-empty.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.get_var(HOME_VAR)
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    pub fn record(&mut self, command: impl Into<String>) {
        self.history.push(command.into());
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_username(vars: &HashMap<String, String>) -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| vars.get(*key))
        .find(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| "user".to_string())
}
