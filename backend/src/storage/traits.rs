//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use std::path::PathBuf;

use super::error::StorageError;
use crate::domain::models::{DecodedState, PersistedState};

/// Trait defining the interface for whole-state persistence
///
/// The state is small (hundreds to low thousands of transactions), so
/// implementations read and write it as a single document.
pub trait StateStorage: Send + Sync {
    /// Load the stored state, skipping records that cannot be decoded
    /// Returns `Ok(None)` when nothing has been stored yet
    fn load_state(&self) -> Result<Option<DecodedState>, StorageError>;

    /// Replace the stored state with `state`
    fn save_state(&self, state: &PersistedState) -> Result<(), StorageError>;

    /// Move the stored document out of the way so the next save starts a
    /// new one. Returns where it was moved, or `None` when nothing is stored.
    fn set_aside_stored_state(&self) -> Result<Option<PathBuf>, StorageError>;
}

/// Connection trait that provides access to storage repositories
pub trait Connection: Send + Sync + Clone {
    /// The type of StateStorage this connection creates
    type StateRepository: StateStorage;

    /// Create a new state repository for this connection
    fn create_state_repository(&self) -> Self::StateRepository;
}
