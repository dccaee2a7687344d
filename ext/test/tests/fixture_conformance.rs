//! Runs every YAML fixture in `fixtures/` against the standard registry.
//!
//! Run with: `cargo test -p remat-test --test fixture_conformance`

#![cfg(feature = "fixtures")]

use remat_test::fixture::Fixture;
use remat_test::standard_registry;
use std::fs;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[test]
fn all_fixtures_pass() {
    let dir = fixtures_dir();
    assert!(dir.exists(), "fixtures directory missing: {}", dir.display());

    let registry = standard_registry();
    let mut ran = 0;

    for entry in fs::read_dir(&dir).expect("read fixtures dir") {
        let path = entry.expect("dir entry").path();
        if !path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            continue;
        }

        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = Fixture::from_yaml_multi(&yaml)
            .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

        for fixture in fixtures {
            fixture
                .run(&registry)
                .unwrap_or_else(|failure| panic!("{}: {failure}", path.display()));
            ran += 1;
        }
    }

    assert!(ran >= 3, "expected at least 3 fixtures, ran {ran}");
}
