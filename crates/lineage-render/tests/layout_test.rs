use lineage_core::{LineageConfig, LineageTree, RawRecord, normalize};
use lineage_render::{LayoutPoint, LayoutedTree, Minimap, layout_tree, links::path_data};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::BTreeMap;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn pt(x: f64, y: f64) -> LayoutPoint {
    LayoutPoint { x, y }
}

fn laid_out(records: Vec<RawRecord>) -> (LineageTree, LayoutedTree) {
    let mut tree = normalize(records).expect("normalize ok");
    let out = layout_tree(&mut tree, &LineageConfig::default()).expect("layout ok");
    (tree, out)
}

/// Alice and Bob share a year, so Bob is lifted next to Alice; Cara is three years after Bob.
fn scenario() -> Vec<RawRecord> {
    vec![
        RawRecord::new(1, "Alice", 2000),
        RawRecord::new(2, "Bob", 2000).with_parent("Alice"),
        RawRecord::new(3, "Cara", 2003)
            .with_parent("Bob")
            .with_active(true),
    ]
}

fn by_name(out: &LayoutedTree) -> BTreeMap<&str, &lineage_render::PositionedNode> {
    out.nodes.iter().map(|n| (n.name.as_str(), n)).collect()
}

#[test]
fn scenario_positions_follow_the_year_rows() {
    let (_, out) = laid_out(scenario());
    let nodes = by_name(&out);

    assert_eq!(out.nodes.len(), 3, "spacers are not visible");
    assert_close(nodes["Alice"].x, 0.0);
    assert_close(nodes["Alice"].y, 76.0);
    assert_close(nodes["Bob"].x, 150.0);
    assert_close(nodes["Bob"].y, 76.0);
    assert_close(nodes["Cara"].x, 150.0);
    assert_close(nodes["Cara"].y, 304.0);
    assert_eq!(out.root, pt(0.0, 0.0));
}

#[test]
fn scenario_nodes_report_declared_lineage() {
    let (tree, out) = laid_out(scenario());
    let nodes = by_name(&out);
    let alice = tree.find_by_name("Alice").unwrap();
    let bob = tree.find_by_name("Bob").unwrap();
    let cara = tree.find_by_name("Cara").unwrap();

    assert_eq!(nodes["Alice"].parent, None);
    assert_eq!(nodes["Alice"].children, Some(vec![bob]));
    assert_eq!(nodes["Bob"].parent, Some(alice));
    assert_eq!(nodes["Cara"].parent, Some(bob));
    assert_eq!(nodes["Cara"].children, None);
    assert_eq!(
        [nodes["Alice"].depth, nodes["Bob"].depth, nodes["Cara"].depth],
        [1, 2, 3]
    );
    assert_eq!(out.node(cara).map(|n| n.record_id), Some(3));
    assert_eq!(out.node_by_record_id(2).map(|n| n.id), Some(bob));
}

#[test]
fn scenario_bounds_cover_every_leaf_with_margins() {
    let (_, out) = laid_out(scenario());
    let b = out.bounds;
    assert_close(b.min_x, -225.0);
    assert_close(b.max_x, 225.0);
    assert_close(b.min_y, -10.0);
    assert_close(b.max_y, 370.0);
}

#[test]
fn scenario_links_use_step_geometry() {
    let (tree, out) = laid_out(scenario());
    let alice = tree.find_by_name("Alice").unwrap();
    let links: BTreeMap<i64, _> = out.links.iter().map(|l| (l.key, l)).collect();
    assert_eq!(links.len(), 3);

    assert_eq!(links[&1].source, None);
    assert_eq!(links[&1].points, vec![pt(0.0, 0.0), pt(0.0, 76.0)]);

    assert_eq!(links[&2].source, Some(alice));
    assert_eq!(
        links[&2].points,
        vec![pt(0.0, 76.0), pt(0.0, 142.0), pt(75.0, 66.0), pt(150.0, 76.0)]
    );
    assert_eq!(
        path_data(&links[&2].points),
        "M0,76L0,142L75,142L75,66L150,66L150,76"
    );

    assert_eq!(links[&3].points, vec![pt(150.0, 76.0), pt(150.0, 304.0)]);
}

#[test]
fn active_records_become_minimap_dots() {
    let (_, out) = laid_out(scenario());
    assert_eq!(out.active_dots.len(), 1);
    let dot = out.active_dots[0];
    assert_eq!(dot.record_id, 3);
    assert_close(dot.x, 150.0);
    assert_close(dot.y, 304.0);

    let minimap = Minimap::new(&out.bounds, &LineageConfig::default().minimap);
    assert_close(minimap.width, 150.0 * 450.0 / 380.0);
    let projected = minimap.dots(&out)[0];
    assert_close(projected.x, minimap.width * 375.0 / 450.0);
    assert_close(projected.y, 150.0 * 314.0 / 380.0);
    assert_eq!(minimap.links(&out).len(), out.links.len());
}

#[test]
fn coordinates_are_written_back_for_spacers_too() {
    let (tree, _) = laid_out(scenario());
    for id in tree.ids() {
        let node = tree.node(id);
        let p = node.coordinate.expect("every arena node is positioned");
        assert_close(p.y, node.depth as f64 * 76.0);
    }
}

#[test]
fn cousins_leave_room_for_each_others_children() {
    // Two families on the same row, each with three littles.
    let mut records = vec![
        RawRecord::new(1, "A", 2000),
        RawRecord::new(2, "B", 2000),
    ];
    for (i, parent) in ["A", "A", "A", "B", "B", "B"].into_iter().enumerate() {
        records.push(RawRecord::new(10 + i as i64, format!("{parent}{i}"), 2001).with_parent(parent));
    }
    let (_, out) = laid_out(records);
    let nodes = by_name(&out);

    // Siblings under the same parent stay one footprint apart.
    assert_close(nodes["A1"].x - nodes["A0"].x, 150.0);
    // A2 and B3 are cousins with no children: one unit apart.
    assert_close(nodes["B3"].x - nodes["A2"].x, 150.0);
    assert_close(nodes["B"].x - nodes["A"].x, 450.0);
}

fn forest_strategy() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(
        (0i64..6, any::<bool>(), prop::option::weighted(0.8, any::<Index>())),
        10..100,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (year, active, big))| {
                let r = RawRecord::new(i as i64, format!("n{i}"), 2000 + year).with_active(active);
                match big {
                    Some(pick) if i > 0 => r.with_parent(format!("n{}", pick.index(i))),
                    _ => r,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn rows_match_years_and_never_overlap(records in forest_strategy()) {
        let min_year = records.iter().filter_map(|r| r.year).min().unwrap_or(2000);
        let (_, out) = laid_out(records);

        let mut rows: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for n in &out.nodes {
            let row_y = (n.year - min_year + 1) as f64 * 76.0;
            prop_assert!((n.y - row_y).abs() < 1e-6, "{} sits at y={} not {}", n.name, n.y, row_y);
            rows.entry(n.year).or_default().push(n.x);
        }
        for xs in rows.values_mut() {
            xs.sort_by(f64::total_cmp);
            for pair in xs.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 150.0 - 1e-6, "boxes overlap at {:?}", pair);
            }
        }

        let b = out.bounds;
        for n in &out.nodes {
            prop_assert!(n.x - 75.0 >= b.min_x - 1e-6 && n.x + 75.0 <= b.max_x + 1e-6);
            prop_assert!(n.y >= b.min_y && n.y + 56.0 <= b.max_y);
        }
    }
}
