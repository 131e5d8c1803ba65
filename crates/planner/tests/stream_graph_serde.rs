use arrow_schema::DataType;
use cfl_common::{IndexId, PageId};
use cfl_planner::{
    compile_append, AppendCompilerConfig, LayoutGuide, ModifyOp, StreamGraph,
};
use cfl_storage::{ClusteredIndexDef, ColumnDef, TableDef};

#[test]
fn stream_graph_is_serializable() {
    let table = TableDef {
        name: "t".to_string(),
        columns: vec![ColumnDef {
            name: "id".to_string(),
            data_type: DataType::Int64,
            nullable: false,
        }],
        clustered_indexes: vec![ClusteredIndexDef {
            name: "t_cluster".to_string(),
            index_id: IndexId(1),
            root_page_id: PageId(500),
            columns: vec![0],
        }],
    };
    let shape = LayoutGuide::new(&table).row_tuple_shape();
    let graph = compile_append(
        &table,
        shape,
        ModifyOp::Insert,
        true,
        &AppendCompilerConfig::default(),
    )
    .unwrap();

    let s = serde_json::to_string(&graph).unwrap();
    let back: StreamGraph = serde_json::from_str(&s).unwrap();
    assert_eq!(back, graph);
}
