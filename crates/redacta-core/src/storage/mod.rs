mod config;
pub mod store;

pub use config::{Config, EssayConfig, GatewayConfig, SimulationConfig};
pub use store::{keys, Database, KvStore, MemoryStore, StateStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/redacta[-dev]/` based on REDACTA_ENV.
///
/// Set REDACTA_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REDACTA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("redacta-dev")
    } else {
        base_dir.join("redacta")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
