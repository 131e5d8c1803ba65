//! Cost estimation for the append node, consumed by an external planner.

use cfl_common::Result;
use cfl_storage::TableDef;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutGuide;

/// Cost triple used by the cost-based planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub rows: f64,
    pub cpu: f64,
    pub io: f64,
}

/// Estimate the cost of appending `child_rows` rows into `table`.
///
/// All three components are deliberate approximations carried over unchanged,
/// because relative planner decisions elsewhere depend on their magnitudes:
/// - `rows` is the child cardinality, even though the append itself emits a
///   single summary row;
/// - `cpu` is proportional to the number of output fields projected;
/// - `io` is proportional to the flattened cluster columns written across all
///   clustered indexes, not to pages touched.
// TODO: compute page-based I/O cost once storage exposes per-index page counts.
pub fn estimate_append_cost(
    child_rows: f64,
    output_fields: usize,
    table: &TableDef,
) -> Result<Cost> {
    let guide = LayoutGuide::new(table);
    let cluster_cols = guide.total_flattened_cluster_cols(table)?;
    Ok(Cost {
        rows: child_rows,
        cpu: child_rows * output_fields as f64,
        io: child_rows * cluster_cols as f64,
    })
}
