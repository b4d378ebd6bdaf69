//! Runtime options of the shell.
//!
//! Values come from three layers: built-in defaults, the environment
//! ([`Config::from_env`]) and command-line flags applied by the binary.

use std::collections::HashMap;

/// Default text editor launched by `notepad`.
#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "gedit";

/// Default code editor launched by `code`.
const DEFAULT_CODE_EDITOR: &str = "code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Emit ANSI colour sequences in the prompt and command output.
    pub color: bool,
    /// Clear the screen before printing the banner.
    pub clear_on_start: bool,
    pub banner: bool,
    /// Window title set when the session starts.
    pub title: String,
    /// Program behind the `notepad` alias.
    pub editor: String,
    /// Program behind the `code` alias.
    pub code_editor: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: true,
            clear_on_start: true,
            banner: true,
            title: "tinysh".to_string(),
            editor: DEFAULT_EDITOR.to_string(),
            code_editor: DEFAULT_CODE_EDITOR.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `VISUAL`/`EDITOR` and `NO_COLOR`.
    pub fn from_env(vars: &HashMap<String, String>) -> Self {
        let mut config = Self::default();
        if let Some(editor) = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| vars.get(*key))
            .find(|value| !value.trim().is_empty())
        {
            config.editor = editor.trim().to_string();
        }
        if vars.get("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            config.color = false;
        }
        config
    }

    /// Plain configuration for tests: no colour, no screen clearing, no banner.
    pub fn plain() -> Self {
        Self {
            color: false,
            clear_on_start: false,
            banner: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_editor() {
        let vars = HashMap::from([
            ("EDITOR".to_string(), "vim".to_string()),
            ("VISUAL".to_string(), " ".to_string()),
        ]);
        let config = Config::from_env(&vars);
        assert_eq!(config.editor, "vim");
        assert_eq!(config.code_editor, "code");
        assert!(config.color);
    }

    #[test]
    fn visual_wins_over_editor() {
        let vars = HashMap::from([
            ("EDITOR".to_string(), "vim".to_string()),
            ("VISUAL".to_string(), "kate".to_string()),
        ]);
        assert_eq!(Config::from_env(&vars).editor, "kate");
    }

    #[test]
    fn no_color_disables_colour() {
        let vars = HashMap::from([("NO_COLOR".to_string(), "1".to_string())]);
        assert!(!Config::from_env(&vars).color);
    }

    #[test]
    fn empty_env_keeps_defaults() {
        assert_eq!(Config::from_env(&HashMap::new()), Config::default());
    }
}
