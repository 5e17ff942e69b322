//! Configuration management.
use crate::error::BenchError;
use config::Config;
use serde::Deserialize;

/// Application settings loaded from `config/<name>.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Default tracing filter (overridable via `RUST_LOG`).
    pub log_level: String,
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// Command descriptor catalog settings.
    pub catalog: CatalogSettings,
    /// Bus transport settings.
    pub transport: TransportSettings,
}

/// HTTP listener settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Interface to bind, e.g. `0.0.0.0`.
    pub listen_addr: String,
    /// TCP port to bind.
    pub port: u16,
}

/// Command descriptor catalog settings.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    /// Directory of per-model CSV tables.
    pub dir: String,
}

/// Bus transport settings.
#[derive(Debug, Deserialize, Clone)]
pub struct TransportSettings {
    /// Read timeout applied to every bus transaction.
    pub read_timeout_ms: u64,
}

impl Settings {
    /// Load settings by configuration name, defaulting to `config/default`.
    pub fn new(config_name: Option<&str>) -> Result<Self, BenchError> {
        let config_path = format!("config/{}", config_name.unwrap_or("default"));
        let s = Config::builder()
            .add_source(config::File::with_name(&config_path))
            .build()
            .map_err(BenchError::Config)?;

        s.try_deserialize().map_err(BenchError::Config)
    }
}
