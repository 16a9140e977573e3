//! Evaluate benchmarks — the hot path.
//!
//! Measures: single requirements per operator, conjunction hit/miss,
//! wide selectors, and trace overhead.

use labelsel::prelude::*;

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test fixtures
// ═══════════════════════════════════════════════════════════════════════════════

fn labels() -> Set {
    Set::new()
        .with("app", "shop")
        .with("env", "prod")
        .with("tier", "web")
        .with("replicas", "12")
}

fn selector(text: &str) -> Selector {
    Selector::parse(text).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Core scenario: one requirement per operator family
// ═══════════════════════════════════════════════════════════════════════════════

const SINGLE: [&str; 7] = [
    "app=shop",
    "app!=shop",
    "env in (dev,qa,prod)",
    "env notin (dev,qa)",
    "tier",
    "!canary",
    "replicas>3",
];

#[divan::bench(args = 0..SINGLE.len())]
fn single_requirement(bencher: divan::Bencher, index: usize) {
    let selector = selector(SINGLE[index]);
    let labels = labels();

    bencher.bench_local(|| selector.matches(&labels));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Core scenario: conjunction
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn conjunction_all_match(bencher: divan::Bencher) {
    let selector = selector("app=shop,env in (prod,qa),tier,!canary,replicas>3");
    let labels = labels();

    bencher.bench_local(|| selector.matches(&labels));
}

#[divan::bench]
fn conjunction_first_fails(bencher: divan::Bencher) {
    // "app" sorts first; the AND stops there.
    let selector = selector("app=other,env in (prod,qa),tier,!canary,replicas>3");
    let labels = labels();

    bencher.bench_local(|| selector.matches(&labels));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scaling: requirement count
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [1, 8, 64])]
fn wide_selector_all_match(bencher: divan::Bencher, n: usize) {
    let set: Set = (0..n).map(|i| (format!("k{i}"), format!("v{i}"))).collect();
    let selector = set.as_selector();

    bencher.bench_local(|| selector.matches(&set));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Trace overhead
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn trace_conjunction(bencher: divan::Bencher) {
    let selector = selector("app=shop,env in (prod,qa),tier,!canary,replicas>3");
    let labels = labels();

    bencher.bench_local(|| selector.matches_with_trace(&labels));
}
