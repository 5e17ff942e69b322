//! Catalog loading from a directory of per-model CSV tables.
//!
//! Each `<MODEL>.csv` under the catalog directory holds the columns `Name`,
//! `CMD`, `GET/SET` and optionally `Parameter`/`Parameters`; the file stem is
//! the model name. Header matching is case-insensitive on trimmed names.
//! Rows missing a name or template, or carrying an unrecognized mode, are
//! dropped; files without the required columns are skipped with a warning, as
//! are unreadable files. Only a missing catalog directory fails the load.

use crate::catalog::{CommandCatalog, CommandDescriptor, CommandMode};
use crate::error::{BenchError, BenchResult};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Load every model table under `dir` into a catalog.
pub fn load_catalog(dir: &Path) -> BenchResult<CommandCatalog> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| BenchError::Catalog(format!("catalog directory {}: {e}", dir.display())))?;

    let mut models = HashMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| BenchError::Catalog(e.to_string()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(model) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let model = model.trim().to_string();
        match load_model_table(&path) {
            Ok(Some(commands)) => {
                debug!(model = %model, commands = commands.len(), "loaded model table");
                models.insert(model, commands);
            }
            Ok(None) => {
                warn!(file = %path.display(), "table missing Name/CMD/GET-SET columns, skipped");
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "unreadable model table, skipped");
            }
        }
    }
    Ok(CommandCatalog::from_models(models))
}

/// Read one model table. `Ok(None)` means the required columns are absent.
fn load_model_table(path: &Path) -> BenchResult<Option<Vec<CommandDescriptor>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| BenchError::Catalog(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| BenchError::Catalog(e.to_string()))?
        .clone();
    let find_column = |wanted: &[&str]| {
        headers
            .iter()
            .position(|h| wanted.iter().any(|w| h.trim().eq_ignore_ascii_case(w)))
    };

    let (Some(name_col), Some(cmd_col), Some(mode_col)) = (
        find_column(&["Name"]),
        find_column(&["CMD"]),
        find_column(&["GET/SET"]),
    ) else {
        return Ok(None);
    };
    let param_col = find_column(&["Parameter", "Parameters"]);

    let mut out = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "malformed row skipped");
                continue;
            }
        };
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let name = field(name_col);
        let template = field(cmd_col);
        let Some(mode) = CommandMode::parse(field(mode_col)) else {
            continue;
        };
        if name.is_empty() || template.is_empty() {
            continue;
        }

        out.push(CommandDescriptor {
            name: name.to_string(),
            template: template.to_string(),
            mode,
            raw_params: param_col.map(|c| field(c).to_string()).unwrap_or_default(),
        });
    }
    Ok(Some(out))
}
