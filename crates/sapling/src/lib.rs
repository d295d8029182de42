#![forbid(unsafe_code)]

//! Tidy tree coordinate assignment.
//!
//! Given an ordered hierarchy, a fixed node size and a separation rule, [`layout`] returns a
//! non-overlapping `(x, y)` for every node reachable from the root. Children keep their declared
//! left-to-right order, `y` is `depth * node_size.height` and the root sits at `x = 0`.
//!
//! The walk follows Buchheim, Jünger & Leipert's linear-time refinement of Walker's algorithm, in
//! the same shape as the `d3.tree()` implementation most web lineage viewers are built on, so a
//! separation callback written for one behaves identically here.

pub mod tidy;

pub use tidy::layout;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Footprint of a single node, including any margin the caller wants kept between boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

/// Read-only view of an ordered rooted tree.
///
/// Node handles are dense indices in `0..node_count()`. Slots that are not reachable from
/// [`Hierarchy::root`] are allowed and simply receive no position.
pub trait Hierarchy {
    fn root(&self) -> usize;
    fn node_count(&self) -> usize;
    fn parent(&self, node: usize) -> Option<usize>;
    fn children(&self, node: usize) -> &[usize];
}

/// `d3.tree()`'s default rule: siblings one unit apart, cousins two.
pub fn default_separation<H: Hierarchy + ?Sized>(h: &H, a: usize, b: usize) -> f64 {
    if h.parent(a) == h.parent(b) { 1.0 } else { 2.0 }
}

/// Minimal owned [`Hierarchy`], mostly useful for tests and benches.
#[derive(Debug, Clone)]
pub struct Tree {
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only its root (node `0`).
    pub fn new() -> Self {
        Self {
            parents: vec![None],
            children: vec![Vec::new()],
        }
    }

    /// Appends a new last child under `parent` and returns its handle.
    pub fn add_child(&mut self, parent: usize) -> usize {
        let id = self.parents.len();
        self.parents.push(Some(parent));
        self.children.push(Vec::new());
        self.children[parent].push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl Hierarchy for Tree {
    fn root(&self) -> usize {
        0
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
