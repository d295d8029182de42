use crate::LoadError;
use lineage_core::{
    Highlight, LineageConfig, LineageTree, NodeId, RawRecord, SearchIndex, SearchOutcome,
    Selection, SelectionState, normalize_with_stats,
};
use lineage_render::{
    ActiveDot, Bounds, Brush, LayoutLink, LayoutedTree, Minimap, PositionedNode,
    ViewportController, layout_tree,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Caller-defined reference to a background image (a URL, an asset key, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundHandle(String);

impl BackgroundHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Natural size of a loaded image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// Where the background image is drawn, in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BackgroundPlacement {
    /// Scales the image to the width of `bounds`, keeping its aspect ratio, and centers it.
    fn fit(bounds: &Bounds, image: ImageSize) -> Self {
        let width = bounds.width();
        let height = if image.width > 0.0 {
            image.height * width / image.width
        } else {
            0.0
        };
        let center = bounds.center();
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone)]
struct Background {
    handle: BackgroundHandle,
    placement: Option<BackgroundPlacement>,
}

/// One loaded lineage tree and the interactive state around it.
#[derive(Debug, Clone)]
pub struct Session {
    config: LineageConfig,
    tree: LineageTree,
    layout: LayoutedTree,
    viewport: ViewportController,
    selection: SelectionState,
    index: SearchIndex,
    background: Option<Background>,
}

impl Session {
    /// Normalizes and lays out `records`. Either every stage succeeds or no session exists.
    pub fn load(records: Vec<RawRecord>, config: LineageConfig) -> Result<Self, LoadError> {
        let record_count = records.len();
        let (mut tree, stats) = normalize_with_stats(records)?;
        let layout = layout_tree(&mut tree, &config)?;
        let viewport = ViewportController::from_config(layout.bounds, &config);
        let index = SearchIndex::new(&tree, &config.search);

        debug!(
            records = record_count,
            spacers = stats.centering_spacers + stats.gap_spacers,
            elevations = stats.elevations,
            "loaded lineage session"
        );

        Ok(Self {
            config,
            tree,
            layout,
            viewport,
            selection: SelectionState::new(),
            index,
            background: None,
        })
    }

    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    pub fn tree(&self) -> &LineageTree {
        &self.tree
    }

    pub fn layout(&self) -> &LayoutedTree {
        &self.layout
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.layout.nodes
    }

    pub fn links(&self) -> &[LayoutLink] {
        &self.layout.links
    }

    pub fn active_dots(&self) -> &[ActiveDot] {
        &self.layout.active_dots
    }

    pub fn bounds(&self) -> Bounds {
        self.layout.bounds
    }

    pub fn minimap(&self) -> &Minimap {
        self.viewport.minimap()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn brush(&self) -> Brush {
        self.viewport.brush()
    }

    /// Looks a record up by its name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.tree.find_by_name(name)
    }

    /// Replaces the current selection. Spacers and unknown ids clear it and return `None`.
    pub fn select(&mut self, id: NodeId) -> Option<&Selection> {
        self.selection.select(&self.tree, id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.current()
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.selection.highlight()
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        self.index.search(query)
    }

    /// Centers the view on a record and selects it, as clicking a search result does.
    ///
    /// Returns `false`, leaving view and selection untouched, when `id` is not a visible record.
    pub fn focus(&mut self, id: NodeId) -> bool {
        let Some(p) = self.layout.position(id) else {
            return false;
        };
        self.viewport.translate_to(p);
        self.selection.select(&self.tree, id).is_some()
    }

    /// Remembers the background image to draw behind the tree. Any earlier placement is
    /// discarded along with the earlier handle.
    pub fn set_background(&mut self, handle: BackgroundHandle) {
        self.background = Some(Background {
            handle,
            placement: None,
        });
    }

    pub fn background(&self) -> Option<&BackgroundHandle> {
        self.background.as_ref().map(|b| &b.handle)
    }

    /// Called once the image behind the current handle has loaded.
    ///
    /// The first call fixes the placement; later calls return it unchanged. `None` when no
    /// background was set.
    pub fn background_loaded(&mut self, size: ImageSize) -> Option<BackgroundPlacement> {
        let bounds = self.layout.bounds;
        let background = self.background.as_mut()?;
        let placement = *background
            .placement
            .get_or_insert_with(|| BackgroundPlacement::fit(&bounds, size));
        Some(placement)
    }

    pub fn background_placement(&self) -> Option<BackgroundPlacement> {
        self.background.as_ref().and_then(|b| b.placement)
    }
}
