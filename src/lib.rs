pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod model;
pub mod orchestrator;
pub mod path;
pub mod routing;
pub mod svg_export;
pub mod viewer;

pub use error::{LayoutError, SchemaError};
pub use geometry::LayoutConfig;
pub use graph::SchemaGraph;
pub use model::Schema;
pub use orchestrator::{compute_layout, drag_node, layout_report, recompute_routes, LayoutReport, LayoutResult};
