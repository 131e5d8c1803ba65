pub mod append_plan;
pub mod cost;
pub mod explain;
pub mod layout;
pub mod logical_plan;
pub mod stream_graph;
pub mod table_access;

pub use append_plan::*;
pub use cost::*;
pub use explain::*;
pub use layout::*;
pub use logical_plan::*;
pub use stream_graph::*;
pub use table_access::*;
