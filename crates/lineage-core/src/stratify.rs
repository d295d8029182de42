//! Flat records to a single-rooted hierarchy.
//!
//! Validation runs before anything is linked, so a rejected load never leaves a partial tree.

use crate::error::{Error, Result};
use crate::record::RawRecord;
use crate::tree::{LineageTree, Links, NodeId, NodeKind, TreeNode};
use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Builds the stratified tree: one synthetic root (`year = min - 1`), every record whose parent
/// does not name another record attached directly under it, children in input order.
///
/// The returned tree has identical layout and true lineage; `order()` is its pre-order.
pub fn stratify(records: Vec<RawRecord>) -> Result<LineageTree> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut years = Vec::with_capacity(records.len());
    for r in &records {
        let Some(year) = r.year else {
            return Err(Error::InvalidOrdinal {
                name: r.name.clone(),
            });
        };
        years.push(year);
    }

    let mut by_name: IndexMap<String, NodeId> = IndexMap::with_capacity(records.len());
    let mut by_record_id: FxHashMap<i64, NodeId> = FxHashMap::default();
    for (i, r) in records.iter().enumerate() {
        let id = NodeId::new(i + 1);
        match by_name.entry(r.name.clone()) {
            Entry::Occupied(_) => {
                return Err(Error::DuplicateId {
                    name: r.name.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        if by_record_id.insert(r.id, id).is_some() {
            return Err(Error::DuplicateRecordId { id: r.id });
        }
    }

    let parents: Vec<Option<usize>> = records
        .iter()
        .map(|r| {
            let declared = r.parent.as_deref().filter(|p| !p.is_empty())?;
            let resolved = by_name.get(declared).map(|id| id.index() - 1);
            if resolved.is_none() {
                warn!(name = %r.name, parent = declared, "parent not found; attaching to root");
            }
            resolved
        })
        .collect();

    if let Some(i) = find_cycle(&parents) {
        return Err(Error::CyclicParentage {
            name: records[i].name.clone(),
        });
    }

    let min_year = years.iter().copied().min().unwrap_or_default();
    let Some(root_year) = min_year.checked_sub(1) else {
        let i = years.iter().position(|&y| y == min_year).unwrap_or_default();
        return Err(Error::InvalidOrdinal {
            name: records[i].name.clone(),
        });
    };

    let root = NodeId::new(0);
    let mut nodes = Vec::with_capacity(records.len() + 1);
    nodes.push(TreeNode::spacer(root_year, 0));
    for (r, year) in records.into_iter().zip(years) {
        nodes.push(TreeNode {
            kind: NodeKind::Record(r),
            year,
            layout: Links::default(),
            lineage: Links::default(),
            depth: 0,
            coordinate: None,
        });
    }

    for (i, parent) in parents.iter().enumerate() {
        let child = NodeId::new(i + 1);
        let parent = parent.map(|p| NodeId::new(p + 1)).unwrap_or(root);
        nodes[child.index()].layout.parent = Some(parent);
        nodes[parent.index()]
            .layout
            .children
            .get_or_insert_with(Vec::new)
            .push(child);
    }

    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![(root, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        order.push(id);
        let node = &mut nodes[id.index()];
        node.depth = depth;
        node.lineage = node.layout.clone();
        stack.extend(node.layout.children().iter().rev().map(|&c| (c, depth + 1)));
    }

    debug!(
        records = order.len() - 1,
        root_year, "stratified lineage records"
    );

    Ok(LineageTree {
        nodes,
        root,
        order,
        by_name,
        by_record_id,
    })
}

/// Returns the index of a record that is its own ancestor, if any.
fn find_cycle(parents: &[Option<usize>]) -> Option<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut path = Vec::new();
    for start in 0..parents.len() {
        let mut cur = Some(start);
        while let Some(i) = cur {
            match marks[i] {
                Mark::Done => break,
                Mark::OnPath => return Some(i),
                Mark::Unvisited => {
                    marks[i] = Mark::OnPath;
                    path.push(i);
                    cur = parents[i];
                }
            }
        }
        for i in path.drain(..) {
            marks[i] = Mark::Done;
        }
    }
    None
}
