//! # Domain Module
//!
//! Business logic of the finance tracker, independent of any UI framework or
//! storage mechanism.
//!
//! ## Module Organization
//!
//! - **transaction_store**: the authoritative transaction log and budget,
//!   persisted after every mutation
//! - **aggregation**: pure functions deriving totals, time-filtered views,
//!   the 7-day trend, category distribution and budget consumption
//! - **dashboard_service**: assembles aggregation results into one payload
//! - **transaction_form**: add-transaction form validation and amount formatting
//! - **export_service**: CSV export of the full history
//! - **app_state**: explicit presentation state with defined transitions
//!
//! ## Business Rules
//!
//! - Amounts are non-negative; the transaction type gives the direction
//! - Totals, trend and category distribution cover the whole history; the
//!   time filter only narrows the displayed list
//! - Week and month windows start strictly after their boundary day
//! - Budget consumption is reported in `[0, 100]` percent

pub mod aggregation;
pub mod app_state;
pub mod dashboard_service;
pub mod export_service;
pub mod models;
pub mod transaction_form;
pub mod transaction_store;

pub use app_state::*;
pub use dashboard_service::*;
pub use export_service::*;
pub use transaction_form::*;
pub use transaction_store::*;
