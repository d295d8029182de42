#![forbid(unsafe_code)]

//! `lineage` is a headless big/little lineage viewer.
//!
//! A [`Session`] owns one loaded tree: its normalized structure, positions, minimap, viewport,
//! current selection and search index. Drawing is left to the caller; everything a renderer
//! needs is exposed as plain serializable data.

mod session;

pub use lineage_core::*;
pub use session::{BackgroundHandle, BackgroundPlacement, ImageSize, Session};

pub mod render {
    pub use lineage_render::links::{path_data, step_points};
    pub use lineage_render::{
        ActiveDot, Bounds, Brush, InteractionState, LayoutLink, LayoutPoint, LayoutedTree,
        LinearScale, Minimap, PositionedNode, ViewportController, ViewportSize, ZoomTransform,
        layout_tree,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Model(#[from] lineage_core::Error),
    #[error(transparent)]
    Layout(#[from] lineage_render::Error),
}
