//! labelsel-test: Test domain for conformance testing
//!
//! Provides a small, controllable label map for exercising selectors, plus the
//! YAML fixture runner (feature `fixtures`).
//!
//! # Example
//!
//! ```
//! use labelsel_test::prelude::*;
//!
//! let labels = TestLabels::new()
//!     .with("app", "shop")
//!     .with("tier", "web");
//!
//! let selector = Selector::parse("app=shop,tier in (web,api)").unwrap();
//! assert!(selector.matches(&labels));
//! ```

use labelsel::Labels;
use std::cell::RefCell;
use std::collections::HashMap;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Test labels: a string-to-string map that remembers which keys were read.
///
/// The lookup log lets tests observe evaluation order, e.g. that a conjunction
/// stops at the first failing requirement.
#[derive(Debug, Clone, Default)]
pub struct TestLabels {
    values: HashMap<String, String>,
    lookups: RefCell<Vec<String>>,
}

impl TestLabels {
    /// Create an empty label map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key-value pair (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Keys looked up so far, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }

    /// Forget recorded lookups.
    pub fn reset(&self) {
        self.lookups.borrow_mut().clear();
    }
}

impl Labels for TestLabels {
    fn get(&self, key: &str) -> Option<&str> {
        self.lookups.borrow_mut().push(key.to_owned());
        self.values.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TestLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |labels, (k, v)| labels.with(k, v))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::TestLabels;
    pub use labelsel::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_labels_builder() {
        let labels = TestLabels::new().with("foo", "bar").with("baz", "");

        assert_eq!(labels.get("foo"), Some("bar"));
        assert_eq!(labels.get("baz"), Some(""));
        assert_eq!(labels.get("missing"), None);
        assert!(labels.has("baz"));
        assert!(!labels.has("missing"));
    }

    #[test]
    fn lookups_are_recorded_in_order() {
        let labels = TestLabels::new().with("a", "1");
        let _ = labels.get("b");
        let _ = labels.get("a");
        assert_eq!(labels.lookups(), ["b", "a"]);

        labels.reset();
        assert!(labels.lookups().is_empty());
    }

    #[test]
    fn conjunction_stops_at_first_failure() {
        // Canonical order is a, b, c; "b" fails so "c" is never read.
        let selector = Selector::parse("c=3,b=2,a=1").unwrap();
        let labels = TestLabels::new().with("a", "1").with("b", "x").with("c", "3");

        assert!(!selector.matches(&labels));
        assert_eq!(labels.lookups(), ["a", "b"]);
    }

    #[test]
    fn trace_reads_every_requirement() {
        let selector = Selector::parse("c=3,b=2,a=1").unwrap();
        let labels = TestLabels::new().with("a", "1").with("b", "x").with("c", "3");

        let trace = selector.matches_with_trace(&labels);
        assert!(!trace.matched);
        assert_eq!(trace.requirements.len(), 3);
        assert!(labels.lookups().contains(&"c".to_owned()));
    }

    #[test]
    fn from_iterator_collects_pairs() {
        let labels: TestLabels = [("env", "prod"), ("tier", "db")].into_iter().collect();
        assert!(Selector::parse("env=prod,tier!=web").unwrap().matches(&labels));
    }

    #[test]
    fn everything_reads_nothing() {
        let labels = TestLabels::new().with("a", "1");
        assert!(Selector::everything().matches(&labels));
        assert!(!Selector::nothing().matches(&labels));
        assert!(labels.lookups().is_empty());
    }
}
