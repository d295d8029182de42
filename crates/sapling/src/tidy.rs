//! Walker/Buchheim first and second walks.
//!
//! Internal slot `0` is a virtual parent of the root, so the root has a sibling list and an
//! apportion anchor like every other node.

use crate::{Hierarchy, NodeSize, Point};

const VIRTUAL: usize = 0;
const ROOT: usize = 1;

#[derive(Debug, Clone)]
struct WalkNode {
    /// Caller's handle (`usize::MAX` for the virtual parent).
    node: usize,
    parent: usize,
    children: Vec<usize>,
    /// Index among siblings.
    number: usize,
    depth: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor carried between consecutive `apportion` calls on this node's children.
    default_ancestor: Option<usize>,
}

impl WalkNode {
    fn new(slot: usize, node: usize, parent: usize, number: usize, depth: usize) -> Self {
        Self {
            node,
            parent,
            children: Vec::new(),
            number,
            depth,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
            ancestor: slot,
            default_ancestor: None,
        }
    }
}

struct Walker<'a, S> {
    nodes: Vec<WalkNode>,
    separation: &'a S,
}

/// Assigns coordinates to every node reachable from `h.root()`.
///
/// `separation(a, b)` receives two caller handles that end up horizontally adjacent (either
/// siblings, or the facing contours of neighbouring subtrees) and returns their minimum distance
/// in node-width units.
pub fn layout<H, S>(h: &H, node_size: NodeSize, separation: S) -> Vec<Option<Point>>
where
    H: Hierarchy + ?Sized,
    S: Fn(usize, usize) -> f64,
{
    let mut out = vec![None; h.node_count()];
    if h.root() >= h.node_count() {
        return out;
    }

    let mut walker = Walker::build(h, &separation);

    for v in walker.post_order() {
        walker.first_walk(v);
    }
    walker.nodes[VIRTUAL].modifier = -walker.nodes[ROOT].prelim;
    for v in walker.pre_order() {
        walker.second_walk(v);
    }

    for n in &walker.nodes[ROOT..] {
        if let Some(slot) = out.get_mut(n.node) {
            *slot = Some(Point {
                x: n.prelim * node_size.width,
                y: n.depth as f64 * node_size.height,
            });
        }
    }
    out
}

impl<'a, S> Walker<'a, S>
where
    S: Fn(usize, usize) -> f64,
{
    fn build<H: Hierarchy + ?Sized>(h: &H, separation: &'a S) -> Self {
        let mut nodes = vec![
            WalkNode::new(VIRTUAL, usize::MAX, VIRTUAL, 0, 0),
            WalkNode::new(ROOT, h.root(), VIRTUAL, 0, 0),
        ];
        nodes[VIRTUAL].children.push(ROOT);

        let mut seen = vec![false; h.node_count()];
        seen[h.root()] = true;
        let mut stack = vec![ROOT];
        while let Some(slot) = stack.pop() {
            let node = nodes[slot].node;
            let depth = nodes[slot].depth;
            let mut kids = Vec::new();
            for &child in h.children(node) {
                // Malformed input (shared or cyclic children) is laid out once, first seen wins.
                if child >= seen.len() || seen[child] {
                    continue;
                }
                seen[child] = true;
                let child_slot = nodes.len();
                nodes.push(WalkNode::new(child_slot, child, slot, kids.len(), depth + 1));
                kids.push(child_slot);
            }
            stack.extend(kids.iter().rev().copied());
            nodes[slot].children = kids;
        }

        Self { nodes, separation }
    }

    /// Left-to-right post-order over real nodes.
    fn post_order(&self) -> Vec<usize> {
        let mut pending = vec![ROOT];
        let mut visited = Vec::with_capacity(self.nodes.len());
        while let Some(v) = pending.pop() {
            visited.push(v);
            pending.extend(self.nodes[v].children.iter().copied());
        }
        visited.reverse();
        visited
    }

    fn pre_order(&self) -> Vec<usize> {
        let mut pending = vec![ROOT];
        let mut visited = Vec::with_capacity(self.nodes.len());
        while let Some(v) = pending.pop() {
            visited.push(v);
            pending.extend(self.nodes[v].children.iter().rev().copied());
        }
        visited
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        (self.separation)(self.nodes[a].node, self.nodes[b].node)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let n = &self.nodes[v];
        if n.number == 0 {
            return None;
        }
        self.nodes[n.parent].children.get(n.number - 1).copied()
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        let n = &self.nodes[v];
        n.children.first().copied().or(n.thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        let n = &self.nodes[v];
        n.children.last().copied().or(n.thread)
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.nodes[v].parent;
        let w = self.left_sibling(v);

        let outer = {
            let kids = &self.nodes[v].children;
            kids.first().copied().zip(kids.last().copied())
        };

        if let Some((first, last)) = outer {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            if let Some(w) = w {
                let prelim = self.nodes[w].prelim + self.separation(v, w);
                self.nodes[v].prelim = prelim;
                self.nodes[v].modifier = prelim - midpoint;
            } else {
                self.nodes[v].prelim = midpoint;
            }
        } else if let Some(w) = w {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        let anchor = self.nodes[parent]
            .default_ancestor
            .unwrap_or(self.nodes[parent].children[0]);
        let anchor = self.apportion(v, w, anchor);
        self.nodes[parent].default_ancestor = Some(anchor);
    }

    fn second_walk(&mut self, v: usize) {
        let parent_modifier = self.nodes[self.nodes[v].parent].modifier;
        let n = &mut self.nodes[v];
        n.prelim += parent_modifier;
        n.modifier += parent_modifier;
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };

        let parent = self.nodes[v].parent;
        // Inner/outer contours on the right subtree (`vip`, `vop`) and the left forest
        // (`vim`, `vom`), with their accumulated modifier sums.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let (next_im, next_ip) = loop {
            let next_im = self.next_right(vim);
            let next_ip = self.next_left(vip);
            let (Some(im), Some(ip)) = (next_im, next_ip) else {
                break (next_im, next_ip);
            };
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break (next_im, next_ip);
            };
            vim = im;
            vip = ip;
            vom = om;
            vop = op;

            self.nodes[vop].ancestor = v;
            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;
        };

        if let Some(im) = next_im {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(im);
                self.nodes[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = next_ip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(ip);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.nodes[vim].ancestor;
        if self.nodes[a].parent == self.nodes[v].parent {
            a
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.nodes[wp].number as f64 - self.nodes[wm].number as f64;
        let change = if subtrees > 0.0 { shift / subtrees } else { shift };
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = std::mem::take(&mut self.nodes[v].children);
        for &c in children.iter().rev() {
            let n = &mut self.nodes[c];
            n.prelim += shift;
            n.modifier += shift;
            change += n.change;
            shift += n.shift + change;
        }
        self.nodes[v].children = children;
    }
}
