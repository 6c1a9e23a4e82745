use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

/// How the college table is sourced for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableMode {
    /// Read the CSV from disk on every request.
    Reload,
    /// Read the CSV once at startup and share the parsed table.
    Snapshot,
}

impl TableMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reload" => Some(TableMode::Reload),
            "snapshot" => Some(TableMode::Snapshot),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub model_path: PathBuf,
    pub colleges_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub table_mode: TableMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = lookup("KCET_MODEL_PATH").unwrap_or_else(|| "kcet_model.json".into());
        let colleges_path =
            lookup("KCET_COLLEGES_PATH").unwrap_or_else(|| "kcet_colleges.csv".into());

        let bind_raw = lookup("KCET_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "KCET_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let table_mode = match lookup("KCET_TABLE_MODE") {
            None => TableMode::Reload,
            Some(raw) => TableMode::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: "KCET_TABLE_MODE",
                value: raw,
            })?,
        };

        Ok(Self {
            model_path: PathBuf::from(model_path),
            colleges_path: PathBuf::from(colleges_path),
            bind_addr,
            table_mode,
        })
    }
}
