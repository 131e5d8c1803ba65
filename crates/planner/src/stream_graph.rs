//! The physical IR handed to the execution engine.
//!
//! A [`StreamGraph`] is an arena of typed stream nodes plus directed
//! producer->consumer edges. Nodes are referenced by [`NodeId`] handles rather
//! than embedded pointers: the graph is acyclic but built incrementally, with
//! edges recorded before the downstream barrier is finalized.

use arrow_schema::DataType;
use cfl_common::{CflError, IndexId, PageId, Result};
use serde::{Deserialize, Serialize};

use crate::layout::Projection;

/// Handle of a node within one [`StreamGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered physical slot types of a node's output tuples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleShape(pub Vec<DataType>);

impl TupleShape {
    /// Single 64-bit row-count slot, the output of row-counting nodes.
    pub fn row_count() -> Self {
        TupleShape(vec![DataType::Int64])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Physical append into one clustered index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAppendDef {
    pub index_id: IndexId,
    pub root_page_id: PageId,
    /// Shape of the index's stored tuple: RID slot, then covered columns.
    pub tuple_shape: TupleShape,
    /// Always the RID slot.
    pub key_proj: Projection,
    /// Flattened input-row offsets of the columns this index stores.
    pub cluster_col_proj: Projection,
    /// Append adds rows; it never replaces.
    pub overwrite: bool,
}

/// A node in the physical execution graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamNode {
    /// Opaque row source produced by an external child operator.
    Source { output: TupleShape },
    /// Full materialization point; re-emits only after its input completes.
    /// Used solely for breaking read-after-write hazards.
    Buffer {
        in_memory: bool,
        multipass: bool,
        output: TupleShape,
    },
    /// Fan-out point broadcasting its input stream unchanged.
    Splitter { output: TupleShape },
    /// One append branch; emits a single row-count row.
    ClusterAppend(ClusterAppendDef),
    /// Emits one aggregate row-count row once every input has completed.
    Barrier { output: TupleShape },
}

impl StreamNode {
    /// Declared output tuple shape.
    ///
    /// The match is exhaustive on purpose: a new node kind must declare its
    /// shape here before the execution engine can consume it.
    pub fn output_shape(&self) -> TupleShape {
        match self {
            StreamNode::Source { output } => output.clone(),
            StreamNode::Buffer { output, .. } => output.clone(),
            StreamNode::Splitter { output } => output.clone(),
            StreamNode::ClusterAppend(_) => TupleShape::row_count(),
            StreamNode::Barrier { output } => output.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StreamNode::Source { .. } => "Source",
            StreamNode::Buffer { .. } => "Buffer",
            StreamNode::Splitter { .. } => "Splitter",
            StreamNode::ClusterAppend(_) => "ClusterAppend",
            StreamNode::Barrier { .. } => "Barrier",
        }
    }
}

/// Directed producer->consumer dataflow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataflowEdge {
    pub producer: NodeId,
    pub consumer: NodeId,
}

/// Arena-backed physical dataflow graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamGraph {
    nodes: Vec<StreamNode>,
    edges: Vec<DataflowEdge>,
}

impl StreamGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: StreamNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_edge(&mut self, producer: NodeId, consumer: NodeId) {
        self.edges.push(DataflowEdge { producer, consumer });
    }

    pub fn node(&self, id: NodeId) -> &StreamNode {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &StreamNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn edges(&self) -> &[DataflowEdge] {
        &self.edges
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.consumer == id).count()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.producer == id).count()
    }

    /// Consumers of `id`, in edge insertion order.
    pub fn consumers_of(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.producer == id)
            .map(|e| e.consumer)
            .collect()
    }

    /// Producers feeding `id`, in edge insertion order.
    pub fn producers_of(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.consumer == id)
            .map(|e| e.producer)
            .collect()
    }

    /// The unique node with no producers (the root source), if any.
    pub fn root(&self) -> Option<NodeId> {
        let mut roots = self.node_ids().filter(|&id| self.in_degree(id) == 0);
        let first = roots.next()?;
        if roots.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// The unique node with no consumers (the terminal), if any.
    pub fn terminal(&self) -> Option<NodeId> {
        let mut sinks = self.node_ids().filter(|&id| self.out_degree(id) == 0);
        let first = sinks.next()?;
        if sinks.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Kahn's algorithm; fails if the edge set contains a cycle, which would
    /// violate the compiler's construction invariant.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let mut in_deg: Vec<usize> = vec![0; self.nodes.len()];
        for e in &self.edges {
            in_deg[e.consumer.0] += 1;
        }
        let mut ready: Vec<NodeId> = (0..self.nodes.len())
            .filter(|&i| in_deg[i] == 0)
            .map(NodeId)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while !ready.is_empty() {
            // Lowest id first, for deterministic rendering.
            ready.sort_unstable_by_key(|id| std::cmp::Reverse(id.0));
            let id = ready.pop().expect("non-empty ready set");
            order.push(id);
            for consumer in self.consumers_of(id) {
                in_deg[consumer.0] -= 1;
                if in_deg[consumer.0] == 0 {
                    ready.push(consumer);
                }
            }
        }
        if order.len() != self.nodes.len() {
            return Err(CflError::Planning(
                "stream graph contains a cycle".to_string(),
            ));
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_handles_and_degrees() {
        let mut g = StreamGraph::new();
        let src = g.add_node(StreamNode::Source {
            output: TupleShape(vec![DataType::Int64]),
        });
        let split = g.add_node(StreamNode::Splitter {
            output: TupleShape(vec![DataType::Int64]),
        });
        let barrier = g.add_node(StreamNode::Barrier {
            output: TupleShape::row_count(),
        });
        g.add_edge(src, split);
        g.add_edge(split, barrier);

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.root(), Some(src));
        assert_eq!(g.terminal(), Some(barrier));
        assert_eq!(g.in_degree(barrier), 1);
        assert_eq!(g.out_degree(split), 1);
        assert_eq!(g.consumers_of(src), vec![split]);
        assert_eq!(g.producers_of(barrier), vec![split]);
    }

    #[test]
    fn cycle_detected() {
        let mut g = StreamGraph::new();
        let a = g.add_node(StreamNode::Splitter {
            output: TupleShape(vec![]),
        });
        let b = g.add_node(StreamNode::Barrier {
            output: TupleShape::row_count(),
        });
        g.add_edge(a, b);
        g.add_edge(b, a);
        assert!(g.topological_order().is_err());
    }

    #[test]
    fn output_shape_is_exhaustive() {
        let node = StreamNode::Barrier {
            output: TupleShape::row_count(),
        };
        assert_eq!(node.output_shape(), TupleShape(vec![DataType::Int64]));
    }
}
