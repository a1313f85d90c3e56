use anyhow::Result;
use chrono::NaiveDateTime;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::state_repository::StateRepository;
use crate::storage::traits::Connection;

/// Storage key of the v1 data layout
pub const DEFAULT_STORAGE_KEY: &str = "luxe_spend_data_v1";

/// JsonConnection manages the data directory and the state file location
#[derive(Debug, Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
    storage_key: String,
}

impl JsonConnection {
    /// Create a new JSON connection rooted at `base_directory` using the default key
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        Self::with_storage_key(base_directory, DEFAULT_STORAGE_KEY)
    }

    /// Create a new JSON connection with an explicit storage key
    pub fn with_storage_key<P: AsRef<Path>>(base_directory: P, storage_key: &str) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            storage_key: storage_key.to_string(),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Path of the JSON document holding the state for this key
    pub fn state_file_path(&self) -> PathBuf {
        self.base_directory.join(format!("{}.json", self.storage_key))
    }

    /// Unused path for keeping an unreadable state file, stamped with `at`:
    /// `<key>.corrupt-<yyyymmdd-hhmmss>.json`, with a counter on collision
    pub fn set_aside_path(&self, at: NaiveDateTime) -> PathBuf {
        let stamp = at.format("%Y%m%d-%H%M%S").to_string();
        let mut candidate = self
            .base_directory
            .join(format!("{}.corrupt-{}.json", self.storage_key, stamp));

        let mut counter = 1;
        while candidate.exists() {
            candidate = self.base_directory.join(format!(
                "{}.corrupt-{}-{}.json",
                self.storage_key, stamp, counter
            ));
            counter += 1;
        }
        candidate
    }
}

impl Connection for JsonConnection {
    type StateRepository = StateRepository;

    fn create_state_repository(&self) -> Self::StateRepository {
        StateRepository::new(self.clone())
    }
}
