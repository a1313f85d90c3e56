//! Test utilities for storage-backed tests
//!
//! `TestEnvironment` keeps its `TempDir` alive for the duration of a test and
//! removes it on drop, even if the test panics.
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use super::connection::JsonConnection;
use crate::domain::models::{DecodedState, PersistedState};
use crate::storage::error::StorageError;
use crate::storage::traits::{Connection, StateStorage};
use shared::{Transaction, TransactionType};

/// Temporary data directory with a connection pointing at it
pub struct TestEnvironment {
    pub connection: JsonConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = JsonConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// Build a stored transaction with a fixed id
pub fn sample_transaction(
    id: &str,
    transaction_type: TransactionType,
    amount: f64,
    category: &str,
    date: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        title: format!("{} {}", transaction_type, id),
        amount,
        transaction_type,
        category: category.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        note: None,
    }
}

/// In-memory connection whose loads, writes and set-asides can be made to
/// fail, for exercising the non-fatal persistence paths
#[derive(Clone, Default)]
pub struct FaultyConnection {
    pub stored: Arc<Mutex<Option<PersistedState>>>,
    pub fail_writes: Arc<Mutex<bool>>,
    /// When set, the stored document reads as corrupt until it is set aside
    pub corrupt: Arc<Mutex<bool>>,
    pub fail_set_aside: Arc<Mutex<bool>>,
}

impl FaultyConnection {
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn set_corrupt(&self, corrupt: bool) {
        *self.corrupt.lock().unwrap() = corrupt;
    }

    pub fn set_fail_set_aside(&self, fail: bool) {
        *self.fail_set_aside.lock().unwrap() = fail;
    }

    pub fn stored_state(&self) -> Option<PersistedState> {
        self.stored.lock().unwrap().clone()
    }
}

pub struct FaultyRepository {
    connection: FaultyConnection,
}

impl StateStorage for FaultyRepository {
    fn load_state(&self) -> Result<Option<DecodedState>, StorageError> {
        if *self.connection.corrupt.lock().unwrap() {
            let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            return Err(StorageError::Corrupt {
                path: "memory".into(),
                source,
            });
        }
        Ok(self.connection.stored_state().map(|state| DecodedState {
            state,
            skipped_records: 0,
        }))
    }

    fn save_state(&self, state: &PersistedState) -> Result<(), StorageError> {
        if *self.connection.fail_writes.lock().unwrap() {
            return Err(StorageError::Write {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
            });
        }
        *self.connection.stored.lock().unwrap() = Some(state.clone());
        Ok(())
    }

    fn set_aside_stored_state(&self) -> Result<Option<PathBuf>, StorageError> {
        if *self.connection.fail_set_aside.lock().unwrap() {
            return Err(StorageError::SetAside {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.connection.set_corrupt(false);
        Ok(self
            .connection
            .stored
            .lock()
            .unwrap()
            .take()
            .map(|_| PathBuf::from("memory.corrupt")))
    }
}

impl Connection for FaultyConnection {
    type StateRepository = FaultyRepository;

    fn create_state_repository(&self) -> Self::StateRepository {
        FaultyRepository {
            connection: self.clone(),
        }
    }
}
