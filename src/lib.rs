//! Client for the XBRL US data service.
//!
//! Multi-valued parameters are fanned out or joined per operation, XML results
//! are flattened into records and merged into a [`xbrl::Table`] whose columns
//! are the union of every attribute seen.

pub mod core;
pub mod xbrl;

// Re-exports
pub use crate::core::{Result, Settings, XbrlError};
pub use xbrl::{Operation, Output, QueryOutput, Table, Value, XbrlClient};
