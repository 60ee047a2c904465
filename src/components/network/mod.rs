mod adjacency;
mod camera;
mod component;
mod details;
mod layout;
mod quadtree;
mod render;
mod scale;
mod selection;
mod sidebar;
mod state;
mod style;
mod tween;
mod types;

pub use component::NetworkCanvas;
pub use details::{EdgeDetails, InformationSummary};
pub use sidebar::Sidebar;
pub use types::Graph;
