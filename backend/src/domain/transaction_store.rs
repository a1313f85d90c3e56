//! Transaction store: the authoritative transaction log and budget.
//!
//! The store owns the in-memory state and writes the whole of it through the
//! storage layer after every mutation. Loading never fails: a missing state
//! file yields an empty log and the default budget, and records that cannot
//! be decoded are skipped. Whenever the stored document could not be read in
//! full it is moved aside before anything is written, so no save can destroy
//! data that failed to load. If it cannot be moved aside, saving stays off
//! for the session.
//!
//! A failed write does not undo the mutation; it is logged and kept as a
//! [`PersistenceWarning`] for the caller to surface.

use log::{error, info, warn};
use shared::{Budget, NewTransaction, Transaction, TransactionForm, TransactionValidationError};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::PersistedState;
use crate::domain::transaction_form::TransactionFormService;
use crate::storage::{Connection, StateStorage};

/// Non-fatal notice about stored data: a write failed, or the stored
/// document could not be read in full
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceWarning {
    pub message: String,
}

impl fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub struct TransactionStore<C: Connection> {
    repository: C::StateRepository,
    state: PersistedState,
    warning: Option<PersistenceWarning>,
    /// Set when unreadable stored data could not be moved aside
    saving_disabled: Option<String>,
}

impl<C: Connection> TransactionStore<C> {
    /// Open the store with the built-in default budget
    pub fn new(connection: Arc<C>) -> Self {
        Self::load(connection, Budget::default())
    }

    /// Open the store, using `default_budget` when no usable state is stored
    pub fn load(connection: Arc<C>, default_budget: Budget) -> Self {
        let repository = connection.create_state_repository();

        let (state, unreadable) = match repository.load_state() {
            Ok(Some(decoded)) => {
                info!(
                    "Loaded {} transactions, budget limit {:.2}",
                    decoded.state.transactions.len(),
                    decoded.state.budget.limit
                );
                let unreadable = (decoded.skipped_records > 0)
                    .then(|| format!("{} unreadable records were skipped", decoded.skipped_records));
                (decoded.state, unreadable)
            }
            Ok(None) => {
                info!("No stored state found, starting with an empty log");
                (PersistedState::with_budget(default_budget), None)
            }
            Err(e) => {
                warn!("Ignoring unreadable stored state, starting fresh: {}", e);
                (PersistedState::with_budget(default_budget), Some(e.to_string()))
            }
        };

        let mut store = Self {
            repository,
            state,
            warning: None,
            saving_disabled: None,
        };

        if let Some(reason) = unreadable {
            store.set_aside_unreadable(&reason);
        }
        store
    }

    /// Keep the partly or wholly unreadable document out of reach of later
    /// saves, then write what was recovered.
    fn set_aside_unreadable(&mut self, reason: &str) {
        match self.repository.set_aside_stored_state() {
            Ok(kept_at) => {
                // Writing immediately keeps the recovered records in place
                // across a restart
                self.persist();
                let location = kept_at
                    .map(|path| format!("; the original file was kept at {}", path.display()))
                    .unwrap_or_default();
                let message = format!("Stored data could not be fully read ({}){}", reason, location);
                warn!("{}", message);
                self.warning = Some(PersistenceWarning { message });
            }
            Err(e) => {
                error!("Could not move unreadable state aside, saving is disabled: {}", e);
                self.saving_disabled = Some(format!(
                    "stored data could not be read ({}) and could not be moved aside ({})",
                    reason, e
                ));
                self.warning = Some(PersistenceWarning {
                    message: format!(
                        "Stored data could not be read ({}); changes will not be saved this session",
                        reason
                    ),
                });
            }
        }
    }

    /// All transactions, most recently added first
    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn budget(&self) -> &Budget {
        &self.state.budget
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.state.transactions.iter().find(|tx| tx.id == id)
    }

    /// Assign a fresh id and put the transaction at the front of the log
    pub fn add(&mut self, new_transaction: NewTransaction) -> Transaction {
        let transaction = new_transaction.into_transaction(Uuid::new_v4().to_string());

        info!(
            "Adding {} transaction {} ({:.2}, {})",
            transaction.transaction_type, transaction.id, transaction.amount, transaction.category
        );

        self.state.transactions.insert(0, transaction.clone());
        self.persist();
        transaction
    }

    /// Validate raw form input and add it when valid
    pub fn add_from_form(
        &mut self,
        form_service: &TransactionFormService,
        form: &TransactionForm,
    ) -> Result<Transaction, Vec<TransactionValidationError>> {
        let new_transaction = form_service.validate(form)?;
        Ok(self.add(new_transaction))
    }

    /// Remove the transaction with `id`. Removing an unknown id is a no-op.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.state.transactions.len();
        self.state.transactions.retain(|tx| tx.id != id);

        if self.state.transactions.len() == before {
            info!("Transaction {} not found, nothing removed", id);
            return false;
        }

        info!("Removed transaction {}", id);
        self.persist();
        true
    }

    /// Replace the budget limit. Non-finite values are ignored.
    pub fn set_budget_limit(&mut self, limit: f64) {
        if !limit.is_finite() {
            warn!("Ignoring non-finite budget limit {}", limit);
            return;
        }

        info!(
            "Budget limit changed from {:.2} to {:.2}",
            self.state.budget.limit, limit
        );
        self.state.budget.limit = limit;
        self.persist();
    }

    /// Take the warning left by the most recent failed write, if any
    pub fn take_warning(&mut self) -> Option<PersistenceWarning> {
        self.warning.take()
    }

    fn persist(&mut self) {
        if let Some(reason) = &self.saving_disabled {
            warn!("Not saving: {}", reason);
            self.warning = Some(PersistenceWarning {
                message: format!("Changes could not be saved: {}", reason),
            });
            return;
        }

        match self.repository.save_state(&self.state) {
            Ok(()) => self.warning = None,
            Err(e) => {
                warn!("Failed to persist state: {}", e);
                self.warning = Some(PersistenceWarning {
                    message: format!("Changes could not be saved: {}", e),
                });
            }
        }
    }
}
