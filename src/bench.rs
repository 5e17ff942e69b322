//! Bench facade: catalog-driven command dispatch over the registry.
//!
//! `Bench` is the central hub of the application. It ties the command
//! descriptor catalog to the instrument registry so a caller can address an
//! instrument by alias and a command by catalog name, and never hand-type a
//! raw command string.

use crate::catalog::params::{parse_param_defs, ParamDef};
use crate::catalog::template::{fill_single_value, render_command, ValueMap};
use crate::catalog::{CommandCatalog, CommandDescriptor, CommandMode};
use crate::error::{BenchError, BenchResult};
use crate::registry::InstrumentRegistry;
use crate::transport::Transport;
use std::sync::Arc;

/// Values supplied with a run request.
#[derive(Debug, Clone)]
pub enum RunValues {
    /// No values supplied.
    None,
    /// A single scalar, mapped onto a lone parameter.
    Single(String),
    /// Named values in supplied order.
    Map(ValueMap),
}

/// Outcome of a dispatched command.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// GET or SET, as dispatched.
    pub mode: CommandMode,
    /// The literal command string sent to the instrument.
    pub command: String,
    /// Query response; empty for writes.
    pub response: String,
}

/// A descriptor together with its freshly parsed parameter definitions.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    /// The catalog descriptor.
    pub descriptor: CommandDescriptor,
    /// Parameter definitions in parse order.
    pub params: Vec<ParamDef>,
}

/// Central hub tying the descriptor catalog to the instrument registry.
pub struct Bench {
    catalog: CommandCatalog,
    registry: InstrumentRegistry,
}

impl Bench {
    /// Create a bench over a loaded catalog and a transport.
    pub fn new(catalog: CommandCatalog, transport: Arc<dyn Transport>) -> Self {
        Self {
            catalog,
            registry: InstrumentRegistry::new(transport),
        }
    }

    /// The command catalog.
    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// The instrument registry.
    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    /// Descriptors (with parsed parameters) for the model behind `alias`.
    pub fn commands_for(&self, alias: &str) -> BenchResult<(String, Vec<CommandInfo>)> {
        let snapshot = self
            .registry
            .resolve(alias)
            .ok_or_else(|| BenchError::AliasNotFound(alias.trim().to_string()))?;

        let commands = self
            .catalog
            .model(&snapshot.model)
            .iter()
            .map(|descriptor| CommandInfo {
                params: parse_param_defs(&descriptor.raw_params, &descriptor.template),
                descriptor: descriptor.clone(),
            })
            .collect();
        Ok((snapshot.model, commands))
    }

    /// Run a cataloged command against the instrument behind `alias`.
    ///
    /// The alias resolves to a model, the model's table yields the
    /// descriptor, and the rendered command is queried (GET) or written
    /// (SET). A single scalar value maps onto the parameter name when the
    /// command takes exactly one parameter.
    pub fn run(&self, alias: &str, name: &str, values: RunValues) -> BenchResult<RunOutcome> {
        let snapshot = self
            .registry
            .resolve(alias)
            .ok_or_else(|| BenchError::AliasNotFound(alias.trim().to_string()))?;
        let descriptor = self.catalog.find(&snapshot.model, name)?;
        let defs = parse_param_defs(&descriptor.raw_params, &descriptor.template);

        let values = match values {
            RunValues::Map(map) => map,
            RunValues::Single(value) if defs.len() == 1 && !value.trim().is_empty() => {
                std::iter::once((defs[0].name.clone(), value)).collect()
            }
            _ => ValueMap::new(),
        };

        let command = render_command(&descriptor.template, &defs, &values)?;
        let response = match descriptor.mode {
            CommandMode::Get => self.registry.query(alias, &command)?,
            CommandMode::Set => {
                self.registry.write(alias, &command)?;
                String::new()
            }
        };
        Ok(RunOutcome {
            mode: descriptor.mode,
            command,
            response,
        })
    }

    /// Run an ad-hoc command: `?` selects query, anything else is a write.
    ///
    /// A supplied value is folded into the command with the single-value
    /// template fill before dispatch.
    pub fn run_custom(
        &self,
        alias: &str,
        raw_command: &str,
        value: Option<&str>,
    ) -> BenchResult<RunOutcome> {
        if self.registry.resolve(alias).is_none() {
            return Err(BenchError::AliasNotFound(alias.trim().to_string()));
        }

        let command = match value {
            Some(v) if !v.trim().is_empty() => fill_single_value(raw_command, v),
            _ => raw_command.trim().to_string(),
        };

        if command.contains('?') {
            let response = self.registry.query(alias, &command)?;
            Ok(RunOutcome {
                mode: CommandMode::Get,
                command,
                response,
            })
        } else {
            self.registry.write(alias, &command)?;
            Ok(RunOutcome {
                mode: CommandMode::Set,
                command,
                response: String::new(),
            })
        }
    }
}
