//! Column layout arithmetic for column-store tables.
//!
//! A declared column may be compound (`Struct`, `FixedSizeList`), in which case
//! it flattens to a fixed, statically-known number of contiguous physical tuple
//! slots. The [`LayoutGuide`] maps declared column ordinals to flattened slot
//! positions and derives the per-index projections and tuple shapes the append
//! compiler attaches to its stream nodes.
//!
//! Slot 0 of the flattened row layout is always the implicit row identifier;
//! declared columns start at slot 1. The key projection and the cluster-column
//! projections index into this one slot space.

use arrow_schema::DataType;
use cfl_common::{CflError, Result};
use cfl_storage::{ClusteredIndexDef, TableDef};

use crate::stream_graph::TupleShape;

/// Ordered physical tuple-slot offsets into a row's flattened layout.
pub type Projection = Vec<usize>;

/// Number of physical slots a declared type occupies once flattened.
///
/// Compound types expand recursively; everything else is a single slot.
pub fn flattened_width(data_type: &DataType) -> usize {
    match data_type {
        DataType::Struct(fields) => fields
            .iter()
            .map(|f| flattened_width(f.data_type()))
            .sum(),
        DataType::FixedSizeList(field, n) => (*n as usize) * flattened_width(field.data_type()),
        _ => 1,
    }
}

fn push_flattened_slot_types(data_type: &DataType, out: &mut Vec<DataType>) {
    match data_type {
        DataType::Struct(fields) => {
            for f in fields.iter() {
                push_flattened_slot_types(f.data_type(), out);
            }
        }
        DataType::FixedSizeList(field, n) => {
            for _ in 0..*n {
                push_flattened_slot_types(field.data_type(), out);
            }
        }
        other => out.push(other.clone()),
    }
}

/// Per-table layout metadata, computed once per compilation.
///
/// Widths and prefix-sum offsets are memoized at construction so that
/// per-index projection building never recomputes them (each covered column is
/// queried once per index).
#[derive(Debug, Clone)]
pub struct LayoutGuide {
    /// Flattened width of each declared column, by ordinal.
    widths: Vec<usize>,
    /// Starting flattened slot of each declared column, by ordinal.
    offsets: Vec<usize>,
    /// Flattened physical slot types of each declared column, by ordinal.
    slot_types: Vec<Vec<DataType>>,
}

impl LayoutGuide {
    /// Physical slot type of the implicit row-identifier column.
    pub fn rid_type() -> DataType {
        DataType::UInt64
    }

    pub fn new(table: &TableDef) -> Self {
        let widths: Vec<usize> = table
            .columns
            .iter()
            .map(|c| flattened_width(&c.data_type))
            .collect();
        let mut offsets = Vec::with_capacity(widths.len());
        // Slot 0 holds the implicit row identifier.
        let mut next = 1;
        for w in &widths {
            offsets.push(next);
            next += w;
        }
        let slot_types = table
            .columns
            .iter()
            .map(|c| {
                let mut out = Vec::new();
                push_flattened_slot_types(&c.data_type, &mut out);
                out
            })
            .collect();
        Self {
            widths,
            offsets,
            slot_types,
        }
    }

    fn check_ordinal(&self, ordinal: usize) -> Result<()> {
        if ordinal >= self.widths.len() {
            return Err(CflError::Layout(format!(
                "index references column ordinal {ordinal} but table declares only {} columns",
                self.widths.len()
            )));
        }
        Ok(())
    }

    /// Flattened width of the column at `ordinal`.
    pub fn flattened_width(&self, ordinal: usize) -> Result<usize> {
        self.check_ordinal(ordinal)?;
        Ok(self.widths[ordinal])
    }

    /// Starting flattened slot of the column at `ordinal`: the running sum of
    /// flattened widths over all preceding columns in declaration order,
    /// after the leading RID slot.
    pub fn flatten_offset(&self, ordinal: usize) -> Result<usize> {
        self.check_ordinal(ordinal)?;
        Ok(self.offsets[ordinal])
    }

    /// Total number of flattened slots in the table's row layout, including
    /// the RID slot.
    pub fn flattened_row_width(&self) -> usize {
        1 + self.widths.iter().sum::<usize>()
    }

    /// The projection covering the columns contained in `index`: for each
    /// covered column in the index's declared order, its full contiguous
    /// sub-range of flattened slots.
    pub fn cluster_column_projection(&self, index: &ClusteredIndexDef) -> Result<Projection> {
        let mut proj = Vec::new();
        for &ordinal in &index.columns {
            let base = self.flatten_offset(ordinal)?;
            let width = self.flattened_width(ordinal)?;
            for j in 0..width {
                proj.push(base + j);
            }
        }
        Ok(proj)
    }

    /// The key is simply the RID slot: every clustered index's stored tuple
    /// begins with the row identifier.
    pub fn key_projection(&self) -> Projection {
        vec![0]
    }

    /// Physical slot types of `index`'s stored tuple: the RID slot followed by
    /// the covered columns' types in flattened order.
    pub fn btree_tuple_shape(&self, index: &ClusteredIndexDef) -> Result<TupleShape> {
        let mut slots = vec![Self::rid_type()];
        for &ordinal in &index.columns {
            self.check_ordinal(ordinal)?;
            slots.extend(self.slot_types[ordinal].iter().cloned());
        }
        Ok(TupleShape(slots))
    }

    /// Physical slot types of the table's fully flattened row: the RID slot
    /// followed by every declared column's flattened types.
    pub fn row_tuple_shape(&self) -> TupleShape {
        let mut slots = vec![Self::rid_type()];
        slots.extend(self.slot_types.iter().flatten().cloned());
        TupleShape(slots)
    }

    /// Number of flattened slots covered by `index`.
    pub fn num_flattened_cluster_cols(&self, index: &ClusteredIndexDef) -> Result<usize> {
        let mut n = 0;
        for &ordinal in &index.columns {
            n += self.flattened_width(ordinal)?;
        }
        Ok(n)
    }

    /// Total flattened slots across all clustered indexes of `table`.
    ///
    /// Columns covered by several indexes count once per index, since each
    /// covering index stores (and writes) its own copy.
    pub fn total_flattened_cluster_cols(&self, table: &TableDef) -> Result<usize> {
        let mut n = 0;
        for index in &table.clustered_indexes {
            n += self.num_flattened_cluster_cols(index)?;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_schema::{Field, Fields};
    use cfl_common::{IndexId, PageId};
    use cfl_storage::ColumnDef;

    fn struct_xy() -> DataType {
        DataType::Struct(Fields::from(vec![
            Field::new("x", DataType::Int64, false),
            Field::new("y", DataType::Int64, false),
        ]))
    }

    fn table_abc() -> TableDef {
        TableDef {
            name: "t".to_string(),
            columns: vec![
                ColumnDef {
                    name: "a".to_string(),
                    data_type: DataType::Int64,
                    nullable: false,
                },
                ColumnDef {
                    name: "b".to_string(),
                    data_type: DataType::Utf8,
                    nullable: false,
                },
                ColumnDef {
                    name: "c".to_string(),
                    data_type: struct_xy(),
                    nullable: false,
                },
            ],
            clustered_indexes: vec![],
        }
    }

    fn index_over(ordinals: Vec<usize>) -> ClusteredIndexDef {
        ClusteredIndexDef {
            name: "idx".to_string(),
            index_id: IndexId(1),
            root_page_id: PageId(10),
            columns: ordinals,
        }
    }

    #[test]
    fn widths_and_offsets() {
        let guide = LayoutGuide::new(&table_abc());
        assert_eq!(guide.flattened_width(0).unwrap(), 1);
        assert_eq!(guide.flattened_width(1).unwrap(), 1);
        assert_eq!(guide.flattened_width(2).unwrap(), 2);
        // offset(i+1) = offset(i) + width(i), starting after the RID slot
        assert_eq!(guide.flatten_offset(0).unwrap(), 1);
        assert_eq!(guide.flatten_offset(1).unwrap(), 2);
        assert_eq!(guide.flatten_offset(2).unwrap(), 3);
        assert_eq!(guide.flattened_row_width(), 5);
    }

    #[test]
    fn nested_compound_widths() {
        let nested = DataType::Struct(Fields::from(vec![
            Field::new("p", struct_xy(), false),
            Field::new("q", DataType::Float64, false),
        ]));
        assert_eq!(flattened_width(&nested), 3);
        let fsl = DataType::FixedSizeList(
            std::sync::Arc::new(Field::new("item", DataType::Float32, false)),
            4,
        );
        assert_eq!(flattened_width(&fsl), 4);
    }

    #[test]
    fn compound_column_projects_contiguous_subrange() {
        let guide = LayoutGuide::new(&table_abc());
        let idx = index_over(vec![2]);
        assert_eq!(guide.cluster_column_projection(&idx).unwrap(), vec![3, 4]);
    }

    #[test]
    fn key_projection_is_rid_slot() {
        let guide = LayoutGuide::new(&table_abc());
        assert_eq!(guide.key_projection(), vec![0]);
    }

    #[test]
    fn btree_tuple_shape_leads_with_rid() {
        let guide = LayoutGuide::new(&table_abc());
        let idx = index_over(vec![0, 2]);
        let shape = guide.btree_tuple_shape(&idx).unwrap();
        assert_eq!(
            shape.0,
            vec![
                DataType::UInt64,
                DataType::Int64,
                DataType::Int64,
                DataType::Int64
            ]
        );
    }

    #[test]
    fn bad_ordinal_is_layout_error() {
        let guide = LayoutGuide::new(&table_abc());
        let idx = index_over(vec![9]);
        let err = guide.cluster_column_projection(&idx).unwrap_err();
        assert!(matches!(err, CflError::Layout(_)));
        assert!(guide.btree_tuple_shape(&idx).is_err());
    }
}
