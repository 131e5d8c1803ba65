use arrow_schema::DataType;
use cfl_common::{CflError, IndexId, PageId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

/// Declared column of a column-store table.
///
/// The column's ordinal is its position in [`TableDef::columns`]. The declared
/// type may be compound (`Struct`, `FixedSizeList`), in which case the column
/// occupies more than one physical tuple slot once flattened for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub nullable: bool,
}

/// Clustered (column-group) index of a table.
///
/// Not a search key: `columns` lists the ordinals of the columns physically
/// co-located in this index's storage, in declaration order. Internally the
/// index is keyed by the implicit row identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredIndexDef {
    pub name: String,
    pub index_id: IndexId,
    pub root_page_id: PageId,
    /// Ordinals into the owning table's declared columns.
    pub columns: Vec<usize>,
}

/// Column-store table definition as read from catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Every insert must write to each of these exactly once per row.
    #[serde(default)]
    pub clustered_indexes: Vec<ClusteredIndexDef>,
}

/// In-memory table registry backing planning-time metadata lookups.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    pub fn register_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Result<&TableDef> {
        self.tables
            .get(name)
            .ok_or_else(|| CflError::Planning(format!("unknown table: {name}")))
    }

    pub fn load_from_json(path: &str) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let tables: Vec<TableDef> =
            serde_json::from_str(&s).map_err(|e| CflError::InvalidConfig(e.to_string()))?;
        let mut cat = Catalog::new();
        for t in tables {
            cat.register_table(t);
        }
        Ok(cat)
    }
}
