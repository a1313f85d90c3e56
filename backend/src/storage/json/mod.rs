//! # JSON Storage Module
//!
//! File-based storage that keeps the entire application state in one JSON
//! document named after the storage key.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── config.yaml                 ← optional, see `config`
//! └── luxe_spend_data_v1.json     ← managed by this module
//! ```
//!
//! ## File Format
//!
//! ```json
//! {
//!   "transactions": [
//!     {"id": "6f1c…", "title": "Lunch", "amount": 12.5, "type": "expense",
//!      "category": "food", "date": "2025-01-15", "note": "with Sam"}
//!   ],
//!   "budget": {"limit": 2000.0, "period": "monthly"}
//! }
//! ```
//!
//! The document carries no version field. Fields added later must default
//! when missing so older files keep loading.

pub mod connection;
pub mod state_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::JsonConnection;
pub use state_repository::StateRepository;
