//! Coordinate assignment and the spacer-free output view.
//!
//! The tidy layout runs over the *layout* lineage (spacers included), so every year lands on its
//! own row. Once coordinates are fixed, spacers are dropped and each visible node is reported with
//! its *declared* parent and children.

use crate::links::step_points;
use crate::model::{ActiveDot, Bounds, LayoutLink, LayoutPoint, LayoutedTree, PositionedNode};
use crate::{Error, Result};
use lineage_core::{LineageConfig, LineageTree, NodeId, Point};
use rustc_hash::FxHashMap;
use sapling::{Hierarchy, NodeSize};
use tracing::debug;

/// Dense-index snapshot of the layout lineage, in the shape [`sapling::layout`] walks.
struct LayoutView {
    root: usize,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl LayoutView {
    fn new(tree: &LineageTree) -> Self {
        let parents = tree
            .ids()
            .map(|id| tree.layout_parent(id).map(NodeId::index))
            .collect();
        let children = tree
            .ids()
            .map(|id| {
                tree.layout_children(id)
                    .iter()
                    .map(|c| c.index())
                    .collect()
            })
            .collect();
        Self {
            root: tree.root().index(),
            parents,
            children,
        }
    }
}

impl Hierarchy for LayoutView {
    fn root(&self) -> usize {
        self.root
    }

    fn node_count(&self) -> usize {
        self.parents.len()
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.parents.get(node).copied().flatten()
    }

    fn children(&self, node: usize) -> &[usize] {
        self.children.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Horizontal spacing, in node widths, between two adjacent nodes of the layout lineage.
///
/// Siblings sit one unit apart. Nodes with different parents also reserve half a unit for every
/// child beyond the first on either side, so neighbouring families do not overlap.
pub fn separation(tree: &LineageTree, a: NodeId, b: NodeId) -> f64 {
    if tree.layout_parent(a) == tree.layout_parent(b) {
        return 1.0;
    }
    let extra = |id: NodeId| match tree.node(id).layout.children.as_deref() {
        Some(kids) => (kids.len() as f64 - 1.0) / 2.0,
        None => 0.0,
    };
    1.0 + extra(a) + extra(b)
}

/// Positions every node of a normalized tree and builds the visible node and link collections.
///
/// Coordinates are also written back into the arena, spacers included.
pub fn layout_tree(tree: &mut LineageTree, config: &LineageConfig) -> Result<LayoutedTree> {
    let node_box = config.node_box;
    let (foot_w, foot_h) = node_box.footprint();
    let ids: Vec<NodeId> = tree.ids().collect();

    let positions = {
        let view = LayoutView::new(tree);
        let tree: &LineageTree = tree;
        sapling::layout(
            &view,
            NodeSize {
                width: foot_w,
                height: foot_h,
            },
            |a, b| separation(tree, ids[a], ids[b]),
        )
    };

    for (&id, pos) in ids.iter().zip(positions) {
        let p = pos.ok_or(Error::Unpositioned { node: id })?;
        tree.set_coordinate(id, Point { x: p.x, y: p.y });
    }

    let tree: &LineageTree = tree;
    let at = |id: NodeId| -> Result<LayoutPoint> {
        tree.node(id)
            .coordinate
            .map(LayoutPoint::from)
            .ok_or(Error::Unpositioned { node: id })
    };

    let leaves = tree
        .layout_leaves()
        .into_iter()
        .map(|id| at(id).map(|p| (p.x, p.y)))
        .collect::<Result<Vec<_>>>()?;
    let extent = Bounds::from_points(leaves).ok_or(Error::EmptyLayout)?;
    let bounds = Bounds {
        min_x: extent.min_x - foot_w / 2.0,
        min_y: -node_box.margin / 2.0,
        max_x: extent.max_x + foot_w / 2.0,
        max_y: extent.max_y + node_box.height + node_box.margin / 2.0,
    };

    let root = tree.root();
    let root_point = at(root)?;

    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut active_dots = Vec::new();
    let mut index = FxHashMap::default();

    for &id in tree.order() {
        let Some(record) = tree.node(id).record() else {
            continue;
        };
        let p = at(id)?;
        let true_parent = tree.true_parent(id);
        let parent = true_parent.filter(|&up| up != root);

        if let Some(up) = true_parent {
            links.push(LayoutLink {
                source: parent,
                target: id,
                key: record.id,
                points: step_points(at(up)?, p, &node_box),
            });
        }
        if record.active {
            active_dots.push(ActiveDot {
                node: id,
                record_id: record.id,
                x: p.x,
                y: p.y,
            });
        }

        index.insert(id, nodes.len());
        nodes.push(PositionedNode {
            id,
            record_id: record.id,
            name: record.name.clone(),
            year: tree.node(id).year,
            year_label: record.display_year(),
            pledge_label: record.pledge_label.clone(),
            active: record.active,
            x: p.x,
            y: p.y,
            parent,
            children: tree.node(id).lineage.children.clone(),
            depth: tree.true_depth(id),
        });
    }

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        active = active_dots.len(),
        min_x = bounds.min_x,
        max_x = bounds.max_x,
        max_y = bounds.max_y,
        "laid out lineage tree"
    );

    Ok(LayoutedTree {
        nodes,
        links,
        active_dots,
        bounds,
        root: root_point,
        index,
    })
}
