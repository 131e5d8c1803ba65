use crate::logical_plan::{Expr, LogicalPlan};
use crate::stream_graph::{StreamGraph, StreamNode, TupleShape};
use cfl_common::Result;

/// Render a compiled stream graph as human-readable multiline text.
///
/// Nodes appear in topological order, one per line, followed by the edge list.
pub fn explain_stream_graph(graph: &StreamGraph) -> Result<String> {
    let mut s = String::new();
    for id in graph.topological_order()? {
        match graph.node(id) {
            StreamNode::Source { output } => {
                s.push_str(&format!("{id}: Source shape={}\n", fmt_shape(output)));
            }
            StreamNode::Buffer {
                in_memory,
                multipass,
                output,
            } => {
                s.push_str(&format!(
                    "{id}: Buffer in_memory={in_memory} multipass={multipass} shape={}\n",
                    fmt_shape(output)
                ));
            }
            StreamNode::Splitter { output } => {
                s.push_str(&format!(
                    "{id}: Splitter fanout={} shape={}\n",
                    graph.out_degree(id),
                    fmt_shape(output)
                ));
            }
            StreamNode::ClusterAppend(def) => {
                s.push_str(&format!(
                    "{id}: ClusterAppend index={} root_page={} key={:?} cluster_cols={:?}\n",
                    def.index_id, def.root_page_id, def.key_proj, def.cluster_col_proj
                ));
            }
            StreamNode::Barrier { output } => {
                s.push_str(&format!(
                    "{id}: Barrier inputs={} shape={}\n",
                    graph.in_degree(id),
                    fmt_shape(output)
                ));
            }
        }
    }
    for e in graph.edges() {
        s.push_str(&format!("  {} -> {}\n", e.producer, e.consumer));
    }
    Ok(s)
}

fn fmt_shape(shape: &TupleShape) -> String {
    let slots: Vec<String> = shape.0.iter().map(|t| format!("{t:?}")).collect();
    format!("[{}]", slots.join(", "))
}

/// Render a logical plan as human-readable multiline text.
pub fn explain_logical(plan: &LogicalPlan) -> String {
    let mut s = String::new();
    fmt_plan(plan, 0, &mut s);
    s
}

fn fmt_plan(plan: &LogicalPlan, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match plan {
        LogicalPlan::TableScan {
            table,
            projection,
            filters,
        } => {
            out.push_str(&format!("{pad}TableScan table={table}\n"));
            out.push_str(&format!("{pad}  projection={:?}\n", projection));
            for f in filters {
                out.push_str(&format!("{pad}    {}\n", fmt_expr(f)));
            }
        }
        LogicalPlan::Filter { predicate, input } => {
            out.push_str(&format!("{pad}Filter {}\n", fmt_expr(predicate)));
            fmt_plan(input, indent + 1, out);
        }
        LogicalPlan::Projection { exprs, input } => {
            out.push_str(&format!("{pad}Projection\n"));
            for (e, name) in exprs {
                out.push_str(&format!("{pad}  {name} := {}\n", fmt_expr(e)));
            }
            fmt_plan(input, indent + 1, out);
        }
        LogicalPlan::Join { on, left, right } => {
            out.push_str(&format!("{pad}Join on={:?}\n", on));
            out.push_str(&format!("{pad}  left:\n"));
            fmt_plan(left, indent + 2, out);
            out.push_str(&format!("{pad}  right:\n"));
            fmt_plan(right, indent + 2, out);
        }
        LogicalPlan::Limit { n, input } => {
            out.push_str(&format!("{pad}Limit n={n}\n"));
            fmt_plan(input, indent + 1, out);
        }
        LogicalPlan::Values { rows } => {
            out.push_str(&format!("{pad}Values rows={}\n", rows.len()));
        }
        LogicalPlan::TableModify {
            table,
            op,
            update_columns,
            input,
        } => {
            out.push_str(&format!(
                "{pad}TableModify table={table} op={op:?} update_columns={update_columns:?}\n"
            ));
            fmt_plan(input, indent + 1, out);
        }
    }
}

fn fmt_expr(e: &Expr) -> String {
    match e {
        Expr::Column(c) => c.clone(),
        Expr::Literal(v) => format!("{v:?}"),
        Expr::Not(x) => format!("NOT ({})", fmt_expr(x)),
        Expr::And(a, b) => format!("({}) AND ({})", fmt_expr(a), fmt_expr(b)),
        Expr::Or(a, b) => format!("({}) OR ({})", fmt_expr(a), fmt_expr(b)),
        Expr::BinaryOp { left, op, right } => {
            format!("({}) {:?} ({})", fmt_expr(left), op, fmt_expr(right))
        }
    }
}
