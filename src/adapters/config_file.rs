//! JSON file configuration store.
//!
//! Implements [`ConfigStore`] over a single `config.json` on the mounted
//! SPIFFS partition (any path on the host).  Writes go to a temporary
//! file first and are renamed into place, so a reset mid-write leaves
//! either the old or the new document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::{ConfigError, ConfigStore};
use crate::config::GateConfig;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<GateConfig, ConfigError> {
        let bytes = std::fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => {
                warn!("config: read {} failed: {}", self.path.display(), e);
                ConfigError::IoError
            }
        })?;

        GateConfig::from_json(&bytes).map_err(|e| {
            warn!("config: {} is not a valid document: {}", self.path.display(), e);
            ConfigError::Corrupted
        })
    }

    fn save(&self, config: &GateConfig) -> Result<(), ConfigError> {
        let bytes = config.to_json().map_err(|_| ConfigError::Corrupted)?;
        let tmp = self.temp_path();

        std::fs::write(&tmp, &bytes)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("config: write {} failed: {}", self.path.display(), e);
                ConfigError::IoError
            })?;

        debug!("config: wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}
