//! # Storage Module
//!
//! Handles persistence of the application state for the finance tracker.
//!
//! The whole state (`{transactions, budget}`) lives under a single storage
//! key and is rewritten in full on every mutation. The domain layer only sees
//! the [`StateStorage`] and [`Connection`] traits, so the JSON file backend can
//! be swapped without touching the store or the aggregation code.
//!
//! ## Current Implementation
//!
//! - **JSON file storage**: one `<storage_key>.json` file in the data directory
//! - **Atomic writes**: write to a temp file, then rename over the old state

pub mod error;
pub mod json;
pub mod traits;

pub use error::StorageError;
pub use json::{JsonConnection, StateRepository};
pub use traits::{Connection, StateStorage};
