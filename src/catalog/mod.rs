//! Table-driven command descriptor catalog.
//!
//! A catalog maps an instrument model name to the ordered list of command
//! descriptors loaded from that model's table. Descriptors are immutable for
//! the process lifetime; command lookup by name is case-insensitive while the
//! stored strings keep their original casing. Name uniqueness within a model
//! is assumed, not enforced — the first match wins.

pub mod format;
pub mod loader;
pub mod params;
pub mod template;

use crate::error::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a command reads from or writes to the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandMode {
    /// Query command: a response is read back.
    Get,
    /// Write command: fire and forget.
    Set,
}

impl CommandMode {
    /// Parse a mode cell, case-insensitively. Unrecognized text yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(CommandMode::Get),
            "SET" => Some(CommandMode::Set),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandMode::Get => write!(f, "GET"),
            CommandMode::Set => write!(f, "SET"),
        }
    }
}

/// A named command definition bound to an instrument model.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    /// Human-facing command name.
    pub name: String,
    /// Command template with `{placeholder}` insertion points.
    pub template: String,
    /// GET or SET.
    pub mode: CommandMode,
    /// Raw parameter specification cell, parsed on demand.
    pub raw_params: String,
}

/// Immutable per-model command descriptor table.
#[derive(Debug, Default)]
pub struct CommandCatalog {
    models: HashMap<String, Vec<CommandDescriptor>>,
}

impl CommandCatalog {
    /// Build a catalog from per-model descriptor lists.
    pub fn from_models(models: HashMap<String, Vec<CommandDescriptor>>) -> Self {
        Self { models }
    }

    /// Descriptors for a model, in table order. Empty for unknown models.
    pub fn model(&self, model: &str) -> &[CommandDescriptor] {
        self.models.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a model has a descriptor table.
    pub fn has_model(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Find a command by case-insensitive name within a model's table.
    pub fn find(&self, model: &str, name: &str) -> BenchResult<&CommandDescriptor> {
        let wanted = name.trim();
        self.model(model)
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BenchError::CommandNotFound {
                name: wanted.to_string(),
                model: model.to_string(),
            })
    }

    /// Names of the models carrying at least one descriptor table.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}
