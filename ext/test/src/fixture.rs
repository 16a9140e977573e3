//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the labelsel engine.
//!
//! ```yaml
//! name: set-based
//! description: in / notin against present and absent keys
//! selector: "env in (prod, qa), tier notin (db)"
//! canonical: "env in (prod,qa),tier notin (db)"
//! cases:
//!   - name: prod web
//!     labels: { env: prod, tier: web }
//!     expect: true
//! ```

use labelsel::{Selector, SelectorError};
use serde::Deserialize;
use std::collections::HashMap;

use crate::TestLabels;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Selector text handed to the parser.
    pub selector: String,
    /// Expected canonical rendering, when the fixture pins it.
    #[serde(default)]
    pub canonical: Option<String>,
    /// The selector must fail to parse.
    #[serde(default)]
    pub expect_error: bool,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub expect: bool,
}

impl TestCase {
    /// Build a `TestLabels` from this case's label map
    pub fn build_labels(&self) -> TestLabels {
        self.labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: bool,
    pub actual: bool,
    /// Rendered evaluation trace, for failure messages.
    pub trace: String,
}

/// Everything a fixture run observed.
#[derive(Debug)]
pub struct FixtureResult {
    pub parsed: Result<Selector, SelectorError>,
    pub cases: Vec<CaseResult>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Parse the selector and run all test cases.
    ///
    /// Cases are skipped when the selector fails to parse.
    pub fn run(&self) -> FixtureResult {
        let parsed = Selector::parse(&self.selector);
        let cases = match &parsed {
            Ok(selector) => self
                .cases
                .iter()
                .map(|case| {
                    let labels = case.build_labels();
                    let actual = selector.matches(&labels);
                    let trace = selector.matches_with_trace(&labels);
                    CaseResult {
                        case_name: case.name.clone(),
                        passed: actual == case.expect && trace.matched == actual,
                        expected: case.expect,
                        actual,
                        trace: trace.to_string(),
                    }
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        FixtureResult { parsed, cases }
    }

    /// Run the fixture and panic on first failure
    pub fn run_and_assert(&self) {
        let result = self.run();

        match (&result.parsed, self.expect_error) {
            (Ok(selector), true) => panic!(
                "Fixture '{}': expected a parse error for {:?}, got {:?}",
                self.name,
                self.selector,
                selector.to_string()
            ),
            (Err(e), false) => panic!(
                "Fixture '{}': failed to parse {:?}: {e}",
                self.name, self.selector
            ),
            (Err(_), true) => return,
            (Ok(_), false) => {}
        }

        if let (Some(expected), Ok(selector)) = (&self.canonical, &result.parsed) {
            let rendered = selector.to_string();
            assert_eq!(
                &rendered, expected,
                "Fixture '{}': canonical form mismatch",
                self.name
            );
            let reparsed = Selector::parse(&rendered).unwrap_or_else(|e| {
                panic!("Fixture '{}': canonical form does not parse: {e}", self.name)
            });
            assert_eq!(
                reparsed.to_string(),
                rendered,
                "Fixture '{}': canonical form is not stable",
                self.name
            );
        }

        for case in result.cases {
            assert!(
                case.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}\n{}",
                self.name, case.case_name, case.expected, case.actual, case.trace
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_fixture() {
        let fixture = Fixture::from_yaml(
            r#"
name: exact
selector: "a=1"
cases:
  - { name: hit, labels: { a: "1" }, expect: true }
  - { name: miss, expect: false }
"#,
        )
        .unwrap();
        assert_eq!(fixture.cases.len(), 2);
        assert!(fixture.cases[1].labels.is_empty());
        fixture.run_and_assert();
    }

    #[test]
    fn parses_multi_document() {
        let fixtures = Fixture::from_yaml_multi(
            r#"
name: one
selector: "a"
---
name: two
selector: "a in ("
expect_error: true
"#,
        )
        .unwrap();
        assert_eq!(fixtures.len(), 2);
        for fixture in &fixtures {
            fixture.run_and_assert();
        }
    }

    #[test]
    fn run_reports_mismatch() {
        let fixture = Fixture::from_yaml(
            r#"
name: wrong
selector: "a=1"
cases:
  - { name: claims match, labels: { a: "2" }, expect: true }
"#,
        )
        .unwrap();
        let result = fixture.run();
        assert!(!result.cases[0].passed);
        assert!(result.cases[0].trace.contains("no match"));
    }

    #[test]
    #[should_panic(expected = "canonical form mismatch")]
    fn canonical_mismatch_panics() {
        let fixture = Fixture::from_yaml("name: c\nselector: \"b,a\"\ncanonical: \"b,a\"\n").unwrap();
        fixture.run_and_assert();
    }
}
