//! Request and response payloads for the JSON API.

use crate::bench::CommandInfo;
use crate::catalog::params::{ParamDef, ParamKind};
use crate::catalog::CommandMode;
use crate::registry::InstrumentRecord;
use crate::transport::DeviceKind;
use serde::{Deserialize, Serialize};

/// One instrument row in scan and alias responses.
#[derive(Debug, Serialize)]
pub struct InstrumentDto {
    pub address: String,
    pub kind: DeviceKind,
    pub vendor: String,
    pub model: String,
    pub serial: String,
    /// Empty string when no alias is assigned.
    pub alias: String,
    /// Whether the model has a descriptor table in the catalog.
    pub has_catalog: bool,
    /// Whether the instrument vanished from the latest scan.
    pub stale: bool,
}

impl InstrumentDto {
    /// Build a row from a registry record.
    pub fn from_record(record: &InstrumentRecord, has_catalog: bool) -> Self {
        Self {
            address: record.address.clone(),
            kind: record.kind,
            vendor: record.vendor.clone(),
            model: record.model.clone(),
            serial: record.serial.clone(),
            alias: record.alias.clone().unwrap_or_default(),
            has_catalog,
            stale: record.stale,
        }
    }
}

/// Instrument list payload shared by scan and set-alias.
#[derive(Debug, Serialize)]
pub struct InstrumentListResponse {
    pub ok: bool,
    pub instruments: Vec<InstrumentDto>,
}

/// Body of `POST /api/set_alias`.
#[derive(Debug, Deserialize)]
pub struct SetAliasRequest {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
}

/// Query string of `GET /api/commands_for_alias`.
#[derive(Debug, Deserialize)]
pub struct CommandsQuery {
    #[serde(default)]
    pub alias: String,
}

/// One parsed parameter definition in a descriptor payload.
#[derive(Debug, Serialize)]
pub struct ParamDefDto {
    pub name: String,
    pub kind: ParamKind,
    pub options: Vec<String>,
    pub format_spec: String,
}

impl From<&ParamDef> for ParamDefDto {
    fn from(def: &ParamDef) -> Self {
        Self {
            name: def.name.clone(),
            kind: def.kind,
            options: def.options.clone(),
            format_spec: def.format_spec.clone(),
        }
    }
}

/// One descriptor in the commands payload.
#[derive(Debug, Serialize)]
pub struct CommandDto {
    pub name: String,
    pub cmd: String,
    pub mode: CommandMode,
    pub parameters_raw: String,
    pub param_defs: Vec<ParamDefDto>,
}

impl From<&CommandInfo> for CommandDto {
    fn from(info: &CommandInfo) -> Self {
        Self {
            name: info.descriptor.name.clone(),
            cmd: info.descriptor.template.clone(),
            mode: info.descriptor.mode,
            parameters_raw: info.descriptor.raw_params.clone(),
            param_defs: info.params.iter().map(ParamDefDto::from).collect(),
        }
    }
}

/// Response of `GET /api/commands_for_alias`.
#[derive(Debug, Serialize)]
pub struct CommandsResponse {
    pub ok: bool,
    pub model: String,
    pub commands: Vec<CommandDto>,
}

/// Body of `POST /api/run`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub name: String,
    /// Named parameter values; key order is preserved.
    pub values: Option<serde_json::Map<String, serde_json::Value>>,
    /// Single-value shortcut when the command takes one parameter.
    pub value: Option<serde_json::Value>,
}

/// Response of `POST /api/run` and `POST /api/custom`.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub ok: bool,
    pub mode: CommandMode,
    pub cmd: String,
    pub response: String,
}

/// Body of `POST /api/custom`.
#[derive(Debug, Deserialize)]
pub struct CustomRequest {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub cmd: String,
    /// Optional value folded into the command template.
    pub value: Option<serde_json::Value>,
}

/// Render a JSON scalar the way an operator typed it.
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
