#![forbid(unsafe_code)]

//! Lineage tree model (headless).
//!
//! Turns flat "big/little" records into a single-rooted tree whose layout view is layered by
//! year, while keeping the declared lineage intact for selection and search:
//! - [`normalize`]: stratify, elevate same-year edges, pad multi-year gaps with spacers
//! - [`selection`]: ancestor/descendant sets and the info summary for one node
//! - [`search`]: case-insensitive name lookup, ordered by year

pub mod config;
pub mod error;
pub mod normalize;
pub mod record;
pub mod search;
pub mod selection;
pub mod stratify;
pub mod tree;

pub use config::{LineageConfig, MinimapConfig, NodeBox, SearchConfig, ViewportConfig, ZoomConfig};
pub use error::{Error, Result};
pub use normalize::{NormalizeStats, normalize, normalize_with_stats};
pub use record::RawRecord;
pub use search::{SearchHit, SearchIndex, SearchOutcome};
pub use selection::{
    Highlight, LinkHighlight, Littles, NodeHighlight, Selection, SelectionState, SelectionSummary,
};
pub use tree::{LineageTree, Links, NodeId, NodeKind, Point, TreeNode};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
