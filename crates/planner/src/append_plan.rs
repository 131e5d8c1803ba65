//! Compiles a logical table append into a physical stream graph.
//!
//! The shape is always fan-out/fan-in: the input row stream is broadcast by a
//! splitter to one cluster-append branch per clustered index of the target
//! table, and a barrier collects every branch's completion before emitting the
//! aggregate row count. When the same plan also reads the target table, a
//! full-materialization buffer is inserted between the source and the splitter
//! so every row is read from the pre-insert state before any row is written.

use cfl_common::{CflError, Result};
use cfl_storage::{Catalog, TableDef};
use tracing::debug;

use crate::layout::LayoutGuide;
use crate::logical_plan::{LogicalPlan, ModifyOp};
use crate::stream_graph::{ClusterAppendDef, StreamGraph, StreamNode, TupleShape};
use crate::table_access::TableAccessMap;

/// Knobs for append-plan compilation.
#[derive(Debug, Clone, Copy)]
pub struct AppendCompilerConfig {
    /// Whether a hazard-breaking buffer may hold its contents in memory rather
    /// than spilling. Either way the buffer fully materializes before
    /// re-emitting.
    pub buffer_in_memory: bool,
}

impl Default for AppendCompilerConfig {
    fn default() -> Self {
        Self {
            buffer_in_memory: false,
        }
    }
}

/// Planning-time metadata lookups the compiler needs.
///
/// The engine provides this from its [`Catalog`].
pub trait MetadataProvider {
    /// Return the definition of a table by name.
    fn table_def(&self, table: &str) -> Result<TableDef>;
}

impl MetadataProvider for Catalog {
    fn table_def(&self, table: &str) -> Result<TableDef> {
        self.get(table).cloned()
    }
}

/// Compile an append against `table` into a stream graph.
///
/// Contracts:
/// - only `ModifyOp::Insert` is accepted; anything else fails with
///   [`CflError::Unsupported`] before any node is built;
/// - the graph contains exactly one `ClusterAppend` per clustered index of
///   `table`, in index declaration order, each with in-degree 1 and
///   out-degree 1;
/// - the barrier's in-degree equals the index count and its output is a single
///   64-bit row count, emitted only once every branch has completed;
/// - when `accessed_for_read` is set, the source's sole consumer is a buffer
///   that fully materializes before feeding the splitter;
/// - a table with zero clustered indexes still compiles: the splitter has no
///   consumers and the barrier, with in-degree zero, completes immediately.
///
/// No partial graph is returned on error.
pub fn compile_append(
    table: &TableDef,
    input_shape: TupleShape,
    operation: ModifyOp,
    accessed_for_read: bool,
    cfg: &AppendCompilerConfig,
) -> Result<StreamGraph> {
    if operation != ModifyOp::Insert {
        return Err(CflError::Unsupported(format!(
            "append compiler supports INSERT only, got {operation:?}"
        )));
    }

    let guide = LayoutGuide::new(table);
    let mut graph = StreamGraph::new();

    let source = graph.add_node(StreamNode::Source {
        output: input_shape.clone(),
    });

    // We only need a buffer if the target table is also a source of the plan.
    let mut upstream = source;
    if accessed_for_read {
        let buffer = graph.add_node(StreamNode::Buffer {
            in_memory: cfg.buffer_in_memory,
            multipass: false,
            output: input_shape.clone(),
        });
        graph.add_edge(upstream, buffer);
        upstream = buffer;
    }

    // The splitter is a pure fan-out point; its output is the input row shape.
    let splitter = graph.add_node(StreamNode::Splitter {
        output: input_shape,
    });
    graph.add_edge(upstream, splitter);

    let mut append_branches = Vec::with_capacity(table.clustered_indexes.len());
    for index in &table.clustered_indexes {
        let append = graph.add_node(StreamNode::ClusterAppend(ClusterAppendDef {
            index_id: index.index_id,
            root_page_id: index.root_page_id,
            tuple_shape: guide.btree_tuple_shape(index)?,
            key_proj: guide.key_projection(),
            cluster_col_proj: guide.cluster_column_projection(index)?,
            overwrite: false,
        }));
        graph.add_edge(splitter, append);
        append_branches.push(append);
    }

    let barrier = graph.add_node(StreamNode::Barrier {
        output: TupleShape::row_count(),
    });
    for append in append_branches {
        graph.add_edge(append, barrier);
    }

    debug!(
        table = %table.name,
        indexes = table.clustered_indexes.len(),
        buffered = accessed_for_read,
        nodes = graph.node_count(),
        "compiled append stream graph"
    );
    Ok(graph)
}

/// Compile a whole logical DML plan rooted at [`LogicalPlan::TableModify`].
///
/// Looks up the target table, derives the input row shape from its flattened
/// layout, and detects the self-read hazard by scanning the entire plan for
/// read accesses to the same table.
pub fn compile_insert(
    provider: &dyn MetadataProvider,
    plan: &LogicalPlan,
    cfg: &AppendCompilerConfig,
) -> Result<StreamGraph> {
    let LogicalPlan::TableModify { table, op, .. } = plan else {
        return Err(CflError::Planning(
            "expected a table modification at the plan root".to_string(),
        ));
    };
    let table_def = provider.table_def(table)?;
    let access = TableAccessMap::of_plan(plan);
    let input_shape = LayoutGuide::new(&table_def).row_tuple_shape();
    compile_append(
        &table_def,
        input_shape,
        *op,
        access.is_accessed_for_read(table),
        cfg,
    )
}
