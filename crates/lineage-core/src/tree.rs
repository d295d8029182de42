//! Arena-backed lineage tree.
//!
//! Every node carries two independent index views of its relationships:
//! - `lineage`: the parent/children declared by the input records, frozen after stratification;
//! - `layout`: the restructured shape (elevations, spacers) the coordinate pass works on.
//!
//! Children lists use `None` for "leaf". The arena never stores an empty `Some(vec![])`, so leaf
//! detection is a single `is_none()` on either view.

use crate::record::RawRecord;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Record(RawRecord),
    /// Structural placeholder: the synthetic root, year padding, or a centering slot.
    Spacer,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    pub parent: Option<NodeId>,
    pub children: Option<Vec<NodeId>>,
}

impl Links {
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub year: i64,
    pub layout: Links,
    pub lineage: Links,
    /// Layout depth; the root is `0`.
    pub depth: usize,
    pub coordinate: Option<Point>,
}

impl TreeNode {
    pub(crate) fn spacer(year: i64, depth: usize) -> Self {
        Self {
            kind: NodeKind::Spacer,
            year,
            layout: Links::default(),
            lineage: Links::default(),
            depth,
            coordinate: None,
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self.kind, NodeKind::Spacer)
    }

    pub fn record(&self) -> Option<&RawRecord> {
        match &self.kind {
            NodeKind::Record(r) => Some(r),
            NodeKind::Spacer => None,
        }
    }

    pub fn name(&self) -> &str {
        self.record().map(|r| r.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct LineageTree {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) root: NodeId,
    pub(crate) order: Vec<NodeId>,
    pub(crate) by_name: IndexMap<String, NodeId>,
    pub(crate) by_record_id: FxHashMap<i64, NodeId>,
}

impl LineageTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Nodes in visiting order: root first, spacers just ahead of the node they were created for.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Sets a node's layout coordinate. Coordinates are the only node state that may change
    /// after normalization.
    pub fn set_coordinate(&mut self, id: NodeId, point: Point) {
        self.nodes[id.0].coordinate = Some(point);
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Record nodes in input order.
    pub fn records(&self) -> impl Iterator<Item = (NodeId, &RawRecord)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.record().map(|r| (NodeId(i), r)))
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn find_by_record_id(&self, id: i64) -> Option<NodeId> {
        self.by_record_id.get(&id).copied()
    }

    pub fn spacer_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_spacer()).count()
    }

    pub fn layout_parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).layout.parent
    }

    pub fn layout_children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).layout.children()
    }

    pub fn true_parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).lineage.parent
    }

    pub fn true_children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).lineage.children()
    }

    /// True-lineage depth: top-level records are `1`.
    pub fn true_depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.true_parent(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.true_parent(p);
        }
        depth
    }

    /// `(parent, child)` pairs of the layout view.
    pub fn layout_edges(&self) -> Vec<(NodeId, NodeId)> {
        self.ids()
            .filter_map(|c| self.layout_parent(c).map(|p| (p, c)))
            .collect()
    }

    /// `(parent, child)` pairs of the declared lineage.
    pub fn true_edges(&self) -> Vec<(NodeId, NodeId)> {
        self.ids()
            .filter_map(|c| self.true_parent(c).map(|p| (p, c)))
            .collect()
    }

    /// Layout leaves, left to right.
    pub fn layout_leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.layout.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.layout.children().iter().rev().copied());
            }
        }
        leaves
    }

    pub(crate) fn push_spacer(&mut self, year: i64, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode::spacer(year, depth));
        id
    }

    /// Unlinks `child` from its layout parent and returns the slot it occupied.
    pub(crate) fn detach_layout(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node_mut(child).layout.parent.take()?;
        let links = &mut self.node_mut(parent).layout;
        let kids = links.children.as_mut()?;
        let at = kids.iter().position(|&c| c == child)?;
        kids.remove(at);
        if kids.is_empty() {
            links.children = None;
        }
        Some((parent, at))
    }

    pub(crate) fn insert_layout_child(&mut self, parent: NodeId, at: usize, child: NodeId) {
        let kids = self
            .node_mut(parent)
            .layout
            .children
            .get_or_insert_with(Vec::new);
        let at = at.min(kids.len());
        kids.insert(at, child);
        self.node_mut(child).layout.parent = Some(parent);
    }

    /// Adds `delta` to the depth of `id` and of every layout descendant.
    pub(crate) fn shift_depth(&mut self, id: NodeId, delta: isize) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let node = self.node_mut(cur);
            node.depth = node.depth.saturating_add_signed(delta);
            stack.extend(node.layout.children().iter().copied());
        }
    }
}
