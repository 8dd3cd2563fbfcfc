//! Persistence of the last selected city.
//!
//! Single key-value cell backed by a JSON file in the config directory.
//! Written fire-and-forget after a successful selection fetch; read once at
//! startup. Last write wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "last_city.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredCity {
    city: String,
}

/// File-backed store for the last successfully selected city name.
#[derive(Debug, Clone)]
pub struct CityStore {
    path: PathBuf,
}

impl CityStore {
    /// Create a store rooted at the given config directory.
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(STORE_FILE),
        }
    }

    /// Read the persisted city, if any.
    ///
    /// # Errors
    /// Fails if the store file exists but cannot be read or parsed.
    pub fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).context("Failed to read city store")?;
        let stored: StoredCity =
            serde_json::from_str(&json).context("Failed to parse city store")?;

        Ok(Some(stored.city))
    }

    /// Persist the city, replacing any previous value.
    ///
    /// # Errors
    /// Fails if the store directory cannot be created or the file written.
    pub fn set(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let json = serde_json::to_string_pretty(&StoredCity {
            city: city.to_string(),
        })
        .context("Failed to serialize city store")?;

        fs::write(&self.path, json).context("Failed to write city store")?;

        tracing::debug!("persisted last city: {}", city);
        Ok(())
    }
}
