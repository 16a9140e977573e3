//! Conformance tests that run YAML fixtures against labelsel
//!
//! Run with: cargo test -p labelsel-test --test conformance

#![cfg(feature = "fixtures")]

use labelsel_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_grammar() {
    run_fixture_file("01_grammar.yaml");
}

#[test]
fn test_matching() {
    run_fixture_file("02_matching.yaml");
}

#[test]
fn test_edge_cases() {
    run_fixture_file("03_edge_cases.yaml");
}

#[test]
fn test_errors() {
    run_fixture_file("04_errors.yaml");
}

/// Every fixture file on disk is covered by one of the tests above.
#[test]
fn test_no_unlisted_fixtures() {
    let listed = [
        "01_grammar.yaml",
        "02_matching.yaml",
        "03_edge_cases.yaml",
        "04_errors.yaml",
    ];
    for entry in fs::read_dir(fixtures_dir()).expect("read fixtures dir") {
        let path = entry.expect("dir entry").path();
        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            assert!(listed.contains(&name), "unlisted fixture file {name}");
        }
    }
}
