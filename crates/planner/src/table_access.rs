//! Which tables a plan reads and writes.
//!
//! The append compiler needs to know whether its target table is also scanned
//! somewhere in the same plan (`INSERT INTO t SELECT * FROM t`). The map is
//! built from the entire plan tree, not just the modification's child.

use std::collections::HashSet;

use crate::logical_plan::LogicalPlan;

/// Read/write table access sets of one logical plan.
#[derive(Debug, Default)]
pub struct TableAccessMap {
    read: HashSet<String>,
    written: HashSet<String>,
}

impl TableAccessMap {
    /// Walk the full plan and record every table access.
    pub fn of_plan(plan: &LogicalPlan) -> Self {
        let mut map = TableAccessMap::default();
        map.visit(plan);
        map
    }

    fn visit(&mut self, plan: &LogicalPlan) {
        match plan {
            LogicalPlan::TableScan { table, .. } => {
                self.read.insert(table.clone());
            }
            LogicalPlan::TableModify { table, .. } => {
                self.written.insert(table.clone());
            }
            _ => {}
        }
        for child in plan.children() {
            self.visit(child);
        }
    }

    pub fn is_accessed_for_read(&self, table: &str) -> bool {
        self.read.contains(table)
    }

    pub fn is_accessed_for_write(&self, table: &str) -> bool {
        self.written.contains(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logical_plan::{LiteralValue, ModifyOp};

    fn scan(table: &str) -> LogicalPlan {
        LogicalPlan::TableScan {
            table: table.to_string(),
            projection: None,
            filters: vec![],
        }
    }

    #[test]
    fn self_insert_reads_and_writes_same_table() {
        let plan = LogicalPlan::TableModify {
            table: "t".to_string(),
            op: ModifyOp::Insert,
            update_columns: None,
            input: Box::new(scan("t")),
        };
        let map = TableAccessMap::of_plan(&plan);
        assert!(map.is_accessed_for_read("t"));
        assert!(map.is_accessed_for_write("t"));
    }

    #[test]
    fn read_access_found_anywhere_in_the_tree() {
        let plan = LogicalPlan::TableModify {
            table: "t".to_string(),
            op: ModifyOp::Insert,
            update_columns: None,
            input: Box::new(LogicalPlan::Join {
                left: Box::new(scan("other")),
                right: Box::new(LogicalPlan::Limit {
                    n: 5,
                    input: Box::new(scan("t")),
                }),
                on: vec![("k".to_string(), "k".to_string())],
            }),
        };
        let map = TableAccessMap::of_plan(&plan);
        assert!(map.is_accessed_for_read("t"));
        assert!(map.is_accessed_for_read("other"));
        assert!(!map.is_accessed_for_write("other"));
    }

    #[test]
    fn values_input_reads_nothing() {
        let plan = LogicalPlan::TableModify {
            table: "t".to_string(),
            op: ModifyOp::Insert,
            update_columns: None,
            input: Box::new(LogicalPlan::Values {
                rows: vec![vec![LiteralValue::Int64(1)]],
            }),
        };
        let map = TableAccessMap::of_plan(&plan);
        assert!(!map.is_accessed_for_read("t"));
        assert!(map.is_accessed_for_write("t"));
    }
}
