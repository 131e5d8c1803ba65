//! Shared error types and identifiers for ColumnFlow crates.
//!
//! Architecture role:
//! - provides common [`CflError`] / [`Result`] contracts
//! - defines typed ids handed out by the catalog and carried by plan IR
//!
//! Key modules:
//! - [`error`]
//! - [`ids`]

pub mod error;
pub mod ids;

pub use error::{CflError, Result};
pub use ids::*;
