#[test]
fn version_matches_cargo_pkg_version() {
    assert_eq!(lineage_core::VERSION, env!("CARGO_PKG_VERSION"));
    assert!(!lineage_core::VERSION.is_empty());
}
