use super::*;

#[test]
fn stratify_attaches_unresolved_parents_to_the_synthetic_root() {
    let tree = crate::stratify::stratify(vec![
        rec(0, "Alice", Some("Nobody"), 2001),
        rec(1, "Bob", None, 2003),
        rec(2, "Cara", Some(""), 2002),
        rec(3, "Dan", Some("Bob"), 2004),
    ])
    .unwrap();

    let root = tree.root();
    assert!(tree.node(root).is_spacer());
    assert_eq!(tree.node(root).year, 2000);
    assert_eq!(layout_names(&tree, root), vec!["Alice", "Bob", "Cara"]);
    assert_eq!(tree.true_parent(id_of(&tree, "Dan")), Some(id_of(&tree, "Bob")));
    assert_eq!(tree.true_parent(id_of(&tree, "Alice")), Some(root));
}

#[test]
fn stratify_initializes_depth_and_pre_order() {
    let tree = crate::stratify::stratify(vec![
        rec(0, "A", None, 2000),
        rec(1, "B", None, 2000),
        rec(2, "A1", Some("A"), 2001),
        rec(3, "A1a", Some("A1"), 2002),
    ])
    .unwrap();

    let names: Vec<&str> = tree.order().iter().map(|&id| tree.node(id).name()).collect();
    assert_eq!(names, vec!["", "A", "A1", "A1a", "B"]);
    assert_eq!(tree.node(id_of(&tree, "A")).depth, 1);
    assert_eq!(tree.node(id_of(&tree, "A1a")).depth, 3);
    for id in tree.ids() {
        assert_eq!(tree.node(id).layout, tree.node(id).lineage);
    }
}

#[test]
fn stratify_marks_childless_nodes_as_leaves_not_empty_lists() {
    let tree = crate::stratify::stratify(vec![rec(0, "A", None, 2000), rec(1, "B", Some("A"), 2001)])
        .unwrap();
    let b = id_of(&tree, "B");
    assert!(tree.node(b).layout.is_leaf());
    assert_eq!(tree.node(b).layout.children, None);
}

#[test]
fn stratify_rejects_empty_input() {
    let err = crate::stratify::stratify(Vec::new()).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}

#[test]
fn stratify_rejects_duplicate_names() {
    let err = crate::stratify::stratify(vec![rec(0, "A", None, 2000), rec(1, "A", None, 2001)])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateId { ref name } if name == "A"));
}

#[test]
fn stratify_rejects_duplicate_record_ids() {
    let err = crate::stratify::stratify(vec![rec(7, "A", None, 2000), rec(7, "B", None, 2001)])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateRecordId { id: 7 }));
}

#[test]
fn stratify_rejects_self_parentage() {
    let err = crate::stratify::stratify(vec![rec(0, "A", Some("A"), 2000)]).unwrap_err();
    assert!(matches!(err, Error::CyclicParentage { ref name } if name == "A"));
}

#[test]
fn stratify_rejects_longer_cycles() {
    let err = crate::stratify::stratify(vec![
        rec(0, "Root", None, 1999),
        rec(1, "A", Some("C"), 2000),
        rec(2, "B", Some("A"), 2001),
        rec(3, "C", Some("B"), 2002),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::CyclicParentage { .. }));
}

#[test]
fn stratify_rejects_missing_years() {
    let mut r = rec(1, "B", Some("A"), 0);
    r.year = None;
    let err = crate::stratify::stratify(vec![rec(0, "A", None, 2000), r]).unwrap_err();
    assert!(matches!(err, Error::InvalidOrdinal { ref name } if name == "B"));
}

#[test]
fn stratify_rejects_a_minimum_year_with_no_predecessor() {
    let err = crate::stratify::stratify(vec![rec(0, "A", None, i64::MIN)]).unwrap_err();
    assert!(matches!(err, Error::InvalidOrdinal { .. }));
}
