//! Ancestor/descendant propagation over the declared lineage.
//!
//! Everything here reads `TreeNode::lineage` only; spacers never appear in a selection.

use crate::tree::{LineageTree, NodeId};
use rustc_hash::FxHashSet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "nodes", rename_all = "snake_case")]
pub enum Littles {
    /// The node has no declared children.
    Empty,
    Listed(Vec<NodeId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub name: String,
    pub year_label: String,
    pub pledge_label: Option<String>,
    /// Declared parent; `None` for top-level records.
    pub big: Option<NodeId>,
    pub littles: Littles,
    pub descendant_count: usize,
    pub active_descendant_count: usize,
    /// Active records in the whole tree, for "n / total" displays.
    pub active_total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeHighlight {
    Selected,
    Ancestor,
    Descendant,
    Neutral,
}

/// Class of the link whose target is a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkHighlight {
    Ancestor,
    Descendant,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub selected: NodeId,
    /// Nearest first.
    pub ancestors: Vec<NodeId>,
    /// Pre-order.
    pub descendants: Vec<NodeId>,
    pub summary: SelectionSummary,
}

impl Selection {
    pub fn highlight(&self) -> Highlight {
        Highlight {
            selected: self.selected,
            ancestors: self.ancestors.iter().copied().collect(),
            descendants: self.descendants.iter().copied().collect(),
        }
    }
}

/// Disjoint highlight sets derived from one [`Selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    selected: NodeId,
    ancestors: FxHashSet<NodeId>,
    descendants: FxHashSet<NodeId>,
}

impl Highlight {
    pub fn node(&self, id: NodeId) -> NodeHighlight {
        if id == self.selected {
            NodeHighlight::Selected
        } else if self.ancestors.contains(&id) {
            NodeHighlight::Ancestor
        } else if self.descendants.contains(&id) {
            NodeHighlight::Descendant
        } else {
            NodeHighlight::Neutral
        }
    }

    /// The link into the selected node belongs to the ancestor path.
    pub fn link(&self, target: NodeId) -> LinkHighlight {
        match self.node(target) {
            NodeHighlight::Selected | NodeHighlight::Ancestor => LinkHighlight::Ancestor,
            NodeHighlight::Descendant => LinkHighlight::Descendant,
            NodeHighlight::Neutral => LinkHighlight::Neutral,
        }
    }

    /// Whether an active record's minimap dot is lit.
    pub fn dot(&self, id: NodeId) -> bool {
        self.descendants.contains(&id)
    }

    /// Record nodes outside all three sets.
    pub fn neutral(&self, tree: &LineageTree) -> Vec<NodeId> {
        tree.records()
            .map(|(id, _)| id)
            .filter(|&id| self.node(id) == NodeHighlight::Neutral)
            .collect()
    }
}

/// Declared ancestors of `id`, nearest first, stopping at the top-level record.
pub fn ancestors(tree: &LineageTree, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut cur = tree.true_parent(id);
    while let Some(p) = cur {
        if tree.node(p).is_spacer() {
            break;
        }
        out.push(p);
        cur = tree.true_parent(p);
    }
    out
}

/// Every declared descendant of `id`, pre-order, excluding `id`.
pub fn descendants(tree: &LineageTree, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = tree.true_children(id).iter().rev().copied().collect();
    while let Some(cur) = stack.pop() {
        out.push(cur);
        stack.extend(tree.true_children(cur).iter().rev().copied());
    }
    out
}

/// Computes the full selection for `id`; `None` for spacers and unknown ids.
pub fn select(tree: &LineageTree, id: NodeId) -> Option<Selection> {
    let record = tree.get(id)?.record()?;

    let ancestors = ancestors(tree, id);
    let descendants = descendants(tree, id);
    let is_active = |n: &NodeId| tree.node(*n).record().is_some_and(|r| r.active);

    let big = tree
        .true_parent(id)
        .filter(|&p| !tree.node(p).is_spacer());
    let littles = match tree.node(id).lineage.children.as_deref() {
        Some(kids) if !kids.is_empty() => Littles::Listed(kids.to_vec()),
        _ => Littles::Empty,
    };

    let summary = SelectionSummary {
        name: record.name.clone(),
        year_label: record.display_year(),
        pledge_label: record.pledge_label.clone().filter(|l| !l.is_empty()),
        big,
        littles,
        descendant_count: descendants.len(),
        active_descendant_count: descendants.iter().filter(|n| is_active(n)).count(),
        active_total: tree.records().filter(|(_, r)| r.active).count(),
    };

    Some(Selection {
        selected: id,
        ancestors,
        descendants,
        summary,
    })
}

/// The session's current selection. Each [`SelectionState::select`] replaces the previous one
/// wholesale, so nothing from an earlier selection survives.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Option<Selection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, tree: &LineageTree, id: NodeId) -> Option<&Selection> {
        self.current = select(tree, id);
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.current.as_ref().map(Selection::highlight)
    }
}
