//! Year layering.
//!
//! Rewrites the layout view of a stratified tree so that every layout edge goes exactly one year
//! forward:
//! - a node whose year is not after its parent's is elevated to its grandparent, as many times
//!   as needed;
//! - a gap of more than one year is padded with one spacer per missing year.
//!
//! The true lineage is untouched; only `layout`, `depth` and the visiting order change.

use crate::error::{Error, Result};
use crate::record::RawRecord;
use crate::stratify::stratify;
use crate::tree::{LineageTree, NodeId};
use tracing::{debug, trace};

/// Counters for one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub elevations: usize,
    pub centering_spacers: usize,
    pub gap_spacers: usize,
}

/// Stratifies `records` and layers the result by year.
pub fn normalize(records: Vec<RawRecord>) -> Result<LineageTree> {
    normalize_with_stats(records).map(|(tree, _)| tree)
}

pub fn normalize_with_stats(records: Vec<RawRecord>) -> Result<(LineageTree, NormalizeStats)> {
    let mut tree = stratify(records)?;
    let stats = layer_by_year(&mut tree)?;
    debug!(
        nodes = tree.len(),
        elevations = stats.elevations,
        centering_spacers = stats.centering_spacers,
        gap_spacers = stats.gap_spacers,
        "normalized lineage tree"
    );
    Ok((tree, stats))
}

/// Runs the elevation and gap-fill pass over an already stratified tree.
pub fn layer_by_year(tree: &mut LineageTree) -> Result<NormalizeStats> {
    let mut pass = Pass {
        tree,
        order: Vec::new(),
        stats: NormalizeStats::default(),
    };
    pass.run()?;
    let Pass { tree, order, stats } = pass;
    tree.order = order;
    Ok(stats)
}

struct Pass<'a> {
    tree: &'a mut LineageTree,
    order: Vec<NodeId>,
    stats: NormalizeStats,
}

impl Pass<'_> {
    fn run(&mut self) -> Result<()> {
        let visit = self.tree.order.clone();
        let root = self.tree.root;
        self.order.reserve(visit.len());
        self.order.push(root);

        for id in visit.into_iter().filter(|&id| id != root) {
            self.settle(id)?;
            self.order.push(id);
        }
        Ok(())
    }

    /// Elevates and pads `id` until its layout edge spans exactly one year.
    fn settle(&mut self, id: NodeId) -> Result<()> {
        loop {
            let Some(parent) = self.tree.layout_parent(id) else {
                return Err(self.invalid_ordinal(id));
            };
            let year = self.tree.node(id).year;
            let parent_year = self.tree.node(parent).year;

            if year <= parent_year {
                self.elevate(id, parent)?;
            } else if i128::from(year) - i128::from(parent_year) > 1 {
                self.pad_above(id, parent);
            } else {
                return Ok(());
            }
        }
    }

    fn elevate(&mut self, id: NodeId, parent: NodeId) -> Result<()> {
        let Some(grandparent) = self.tree.layout_parent(parent) else {
            return Err(self.invalid_ordinal(id));
        };

        self.tree.detach_layout(id);

        let siblings = self.tree.layout_children(grandparent);
        let count = siblings.len();
        let first = siblings.first() == Some(&parent);
        let at = if first && count > 1 { 0 } else { count };
        self.tree.insert_layout_child(grandparent, at, id);
        self.tree.shift_depth(id, -1);
        self.stats.elevations += 1;
        trace!(node = self.tree.node(id).name(), slot = at, "elevated");

        if self.tree.node(id).year == self.tree.node(parent).year {
            let anchor = self.nearest_record_ancestor(grandparent);
            if self.tree.layout_children(anchor).len() % 2 == 0 {
                let year = self.tree.node(grandparent).year + 1;
                let depth = self.tree.node(parent).depth;
                let spacer = self.tree.push_spacer(year, depth);
                self.tree.insert_layout_child(grandparent, 0, spacer);
                self.order.push(spacer);
                self.stats.centering_spacers += 1;
                trace!(year, depth, "centering spacer");
            }
        }
        Ok(())
    }

    /// Replaces `id` in its parent's children with a spacer one year after the parent and hangs
    /// `id` under it.
    fn pad_above(&mut self, id: NodeId, parent: NodeId) {
        let year = self.tree.node(parent).year + 1;
        let depth = self.tree.node(parent).depth + 1;
        let spacer = self.tree.push_spacer(year, depth);

        if let Some(slot) = self
            .tree
            .node_mut(parent)
            .layout
            .children
            .as_mut()
            .and_then(|kids| kids.iter_mut().find(|c| **c == id))
        {
            *slot = spacer;
        }
        let links = &mut self.tree.node_mut(spacer).layout;
        links.parent = Some(parent);
        links.children = Some(vec![id]);
        self.tree.node_mut(id).layout.parent = Some(spacer);
        self.tree.shift_depth(id, 1);

        self.order.push(spacer);
        self.stats.gap_spacers += 1;
        trace!(node = self.tree.node(id).name(), year, "gap spacer");
    }

    /// Walks up from `id` past spacers; the root ends the walk even though it is one.
    fn nearest_record_ancestor(&self, mut id: NodeId) -> NodeId {
        while self.tree.node(id).is_spacer() {
            match self.tree.layout_parent(id) {
                Some(up) => id = up,
                None => break,
            }
        }
        id
    }

    fn invalid_ordinal(&self, id: NodeId) -> Error {
        Error::InvalidOrdinal {
            name: self.tree.node(id).name().to_string(),
        }
    }
}
