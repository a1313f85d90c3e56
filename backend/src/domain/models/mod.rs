//! Domain models owned by the backend. The transaction and budget records
//! themselves live in the `shared` crate.

pub mod persisted_state;

pub use persisted_state::{DecodedState, PersistedState};
