//! Registry mapping command names and aliases to built-in handlers.

use std::collections::HashMap;

use crate::builtin;
use crate::command::Command;
use crate::error::{Result, ShellError};

/// Name handled by the dispatch loop itself; it can never be registered.
pub const EXIT_COMMAND: &str = "exit";

/// Registry of built-in commands.
///
/// Every name a command answers to (canonical name and aliases) maps to one
/// registration. Name sets are disjoint and lookups are exact and
/// case-sensitive.
#[derive(Default)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in command.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Register a command under its name and all of its aliases.
    ///
    /// Fails without changing the registry if any of those names is already
    /// taken.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let names: Vec<&'static str> = std::iter::once(cmd.name())
            .chain(cmd.aliases().iter().copied())
            .collect();
        for (i, name) in names.iter().enumerate() {
            if *name == EXIT_COMMAND || self.index.contains_key(name) || names[..i].contains(name)
            {
                return Err(ShellError::DuplicateAlias {
                    alias: name.to_string(),
                });
            }
        }
        let slot = self.commands.len();
        for name in names {
            self.index.insert(name, slot);
        }
        self.commands.push(cmd);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.index
            .get(name)
            .map(|&slot| self.commands[slot].as_ref())
    }

    /// Registered commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|cmd| cmd.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
