//! Relationship graph: rows to nodes and edges, force layout, canvas view.

mod component;
pub mod config;
mod error;
mod interaction;
pub mod records;
mod render;
pub mod scale;
mod simulation;
mod state;
mod transform;
mod types;

pub use component::RelationshipGraphCanvas;
pub use config::{DEFAULT_COLORS, FieldNames, ForceParams, ShapeLimits, VisConfig};
pub use error::{Result, VisError};
pub use interaction::DragController;
pub use records::{QueryResponse, prepare, rows_from_records, validate_query};
pub use simulation::{
	BindReport, NodeIndex, SimLink, SimNode, Simulation, TickCallback, TickStatus,
};
pub use transform::{GROUP_EDGE_VALUE, NO_GROUP, transform};
pub use types::{GraphData, GraphEdge, GraphNode, Registry, Row, Viewport};
