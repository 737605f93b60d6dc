mod component;
pub mod physics;
mod render;
pub mod selection;
mod state;
pub mod types;

pub use component::GraphCanvas;
pub use physics::{LayoutController, PARAM_SPECS, ParamKey, PhysicsConfig};
pub use selection::{InteractionMode, SelectionEngine, XorShiftRng};
pub use state::GraphViewState;
pub use types::{GraphDataset, GraphEdge, GraphNode};
