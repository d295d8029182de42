use crate::*;

mod stratify;

fn rec(id: i64, name: &str, parent: Option<&str>, year: i64) -> RawRecord {
    let r = RawRecord::new(id, name, year);
    match parent {
        Some(p) => r.with_parent(p),
        None => r,
    }
}

fn id_of(tree: &LineageTree, name: &str) -> NodeId {
    tree.find_by_name(name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

/// Layout children rendered as names, spacers as `_<year>`.
fn layout_names(tree: &LineageTree, id: NodeId) -> Vec<String> {
    tree.layout_children(id)
        .iter()
        .map(|&c| {
            let n = tree.node(c);
            if n.is_spacer() {
                format!("_{}", n.year)
            } else {
                n.name().to_string()
            }
        })
        .collect()
}
