//! # JSON State Repository
//!
//! Reads and writes the `{transactions, budget}` document for one storage key.
//! Writes go to `<key>.tmp` first and are renamed over the state file, so a
//! crash mid-write leaves the previous state intact. A file that cannot be
//! read is renamed to `<key>.corrupt-<timestamp>.json` rather than deleted.

use chrono::Local;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

use super::connection::JsonConnection;
use crate::domain::models::{DecodedState, PersistedState};
use crate::storage::error::StorageError;
use crate::storage::traits::StateStorage;

/// JSON-file state repository
#[derive(Debug, Clone)]
pub struct StateRepository {
    connection: JsonConnection,
}

impl StateRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

impl StateStorage for StateRepository {
    fn load_state(&self) -> Result<Option<DecodedState>, StorageError> {
        let path = self.connection.state_file_path();

        if !path.exists() {
            debug!("No stored state at {:?}", path);
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;

        let decoded = PersistedState::decode_lenient(&content)
            .map_err(|source| StorageError::Corrupt { path: path.clone(), source })?;

        debug!(
            "Loaded {} transactions from {:?} ({} skipped)",
            decoded.state.transactions.len(),
            path,
            decoded.skipped_records
        );
        Ok(Some(decoded))
    }

    fn save_state(&self, state: &PersistedState) -> Result<(), StorageError> {
        let path = self.connection.state_file_path();
        let base_dir = self.connection.base_directory();

        if !base_dir.exists() {
            fs::create_dir_all(base_dir).map_err(|source| StorageError::Write {
                path: base_dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(state)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(|source| StorageError::Write {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(
            "Saved {} transactions to {:?}",
            state.transactions.len(),
            path
        );
        Ok(())
    }

    fn set_aside_stored_state(&self) -> Result<Option<PathBuf>, StorageError> {
        let path = self.connection.state_file_path();
        if !path.exists() {
            return Ok(None);
        }

        let target = self.connection.set_aside_path(Local::now().naive_local());
        fs::rename(&path, &target).map_err(|source| StorageError::SetAside {
            path: path.clone(),
            source,
        })?;

        warn!("Moved unreadable state {:?} to {:?}", path, target);
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::test_utils::{sample_transaction, TestEnvironment};
    use crate::storage::traits::Connection;
    use shared::{Budget, TransactionType};

    #[test]
    fn test_load_returns_none_when_nothing_stored() {
        let env = TestEnvironment::new().unwrap();
        let repo = env.connection.create_state_repository();

        assert!(repo.load_state().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_budget() {
        let env = TestEnvironment::new().unwrap();
        let repo = env.connection.create_state_repository();

        let state = PersistedState {
            transactions: vec![
                sample_transaction("t3", TransactionType::Expense, 40.0, "food", "2025-01-15"),
                sample_transaction("t2", TransactionType::Income, 100.0, "salary", "2025-01-14"),
                sample_transaction("t1", TransactionType::Expense, 10.0, "transport", "2025-01-16"),
            ],
            budget: Budget { limit: 750.0, ..Budget::default() },
        };

        repo.save_state(&state).unwrap();
        let loaded = repo.load_state().unwrap().unwrap();

        assert_eq!(loaded.state, state);
        assert_eq!(loaded.skipped_records, 0);
        assert!(!env.connection.state_file_path().with_extension("tmp").exists());
    }

    #[test]
    fn test_load_reports_corrupt_file() {
        let env = TestEnvironment::new().unwrap();
        std::fs::write(env.connection.state_file_path(), "{not json").unwrap();

        let repo = env.connection.create_state_repository();
        let err = repo.load_state().unwrap_err();

        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_load_skips_unreadable_records() {
        let env = TestEnvironment::new().unwrap();
        std::fs::write(
            env.connection.state_file_path(),
            r#"{"transactions":[
                {"id":"ok","title":"Coffee","amount":4.5,"type":"expense","category":"food","date":"2025-02-03"},
                {"id":"bad","title":"Coffee","amount":4.5,"type":"expense","category":"food","date":""}
            ],"budget":{"limit":900}}"#,
        )
        .unwrap();

        let repo = env.connection.create_state_repository();
        let loaded = repo.load_state().unwrap().unwrap();

        assert_eq!(loaded.state.transactions.len(), 1);
        assert_eq!(loaded.state.transactions[0].id, "ok");
        assert_eq!(loaded.state.budget.limit, 900.0);
        assert_eq!(loaded.skipped_records, 1);
    }

    #[test]
    fn test_set_aside_moves_the_file() {
        let env = TestEnvironment::new().unwrap();
        let repo = env.connection.create_state_repository();
        assert!(repo.set_aside_stored_state().unwrap().is_none());

        let path = env.connection.state_file_path();
        std::fs::write(&path, "{not json").unwrap();

        let target = repo.set_aside_stored_state().unwrap().unwrap();

        assert!(!path.exists());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{not json");
        let name = target.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("luxe_spend_data_v1.corrupt-"));
        assert!(repo.load_state().unwrap().is_none());
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        let env = TestEnvironment::new().unwrap();
        std::fs::write(env.connection.state_file_path(), r#"{"budget":{"limit":300}}"#).unwrap();

        let repo = env.connection.create_state_repository();
        let loaded = repo.load_state().unwrap().unwrap().state;

        assert!(loaded.transactions.is_empty());
        assert_eq!(loaded.budget.limit, 300.0);
    }

    #[test]
    fn test_reads_legacy_storage_layout() {
        let env = TestEnvironment::new().unwrap();
        let legacy = r#"{
            "transactions": [
                {"id":"k2j3h4g5f","title":"Coffee","amount":4.5,"type":"expense","category":"food","date":"2025-02-03","note":""},
                {"id":"a9s8d7f6g","title":"Paycheck","amount":2500,"type":"income","category":"salary","date":"2025-02-01"}
            ],
            "budget": {"limit": 2000, "period": "monthly"}
        }"#;
        std::fs::write(env.connection.state_file_path(), legacy).unwrap();

        let repo = env.connection.create_state_repository();
        let loaded = repo.load_state().unwrap().unwrap().state;

        assert_eq!(loaded.transactions.len(), 2);
        assert_eq!(loaded.transactions[0].id, "k2j3h4g5f");
        assert_eq!(loaded.transactions[0].note.as_deref(), Some(""));
        assert_eq!(loaded.transactions[1].amount, 2500.0);
        assert_eq!(loaded.budget, Budget::default());
    }
}
