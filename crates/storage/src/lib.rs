//! Catalog metadata for ColumnFlow: tables, columns, and clustered indexes.
//!
//! Architecture role:
//! - defines the read-only metadata the planner consumes
//! - hosts the [`Catalog`] registry with JSON loading for tools/tests
//!
//! Table/column/index definitions outlive any single compilation; the planner
//! treats them as immutable.

pub mod catalog;

pub use catalog::{Catalog, ClusteredIndexDef, ColumnDef, TableDef};
