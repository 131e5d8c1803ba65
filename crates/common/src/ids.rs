//! Typed identifiers shared across catalog/planner components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a clustered index, assigned at DDL time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexId(
    /// Raw numeric id value.
    pub u64,
);

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical root page handle of an index's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(
    /// Raw numeric id value.
    pub u64,
);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
