#![forbid(unsafe_code)]

//! Positional layer over a normalized [`lineage_core::LineageTree`].
//!
//! [`layout::layout_tree`] assigns coordinates and produces the spacer-free node and link
//! collections; [`viewport::ViewportController`] keeps the main view, the minimap and its brush
//! in sync.

pub mod layout;
pub mod links;
pub mod minimap;
pub mod model;
pub mod viewport;

pub use layout::layout_tree;
pub use minimap::{LinearScale, Minimap};
pub use model::{ActiveDot, Bounds, LayoutLink, LayoutPoint, LayoutedTree, PositionedNode};
pub use viewport::{Brush, InteractionState, ViewportController, ViewportSize, ZoomTransform};

use lineage_core::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("layout did not assign a position to node {node:?}")]
    Unpositioned { node: NodeId },
    #[error("layout produced no leaves to measure")]
    EmptyLayout,
}

pub type Result<T> = std::result::Result<T, Error>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
