//! Evaluation trace types for debugging selector behavior.
//!
//! [`Selector::matches_with_trace`](crate::Selector::matches_with_trace) records,
//! for every requirement, the label value it looked at and whether it matched.
//!
//! # Example
//!
//! ```
//! use labelsel::{Selector, Set};
//!
//! let selector = Selector::parse("tier=web, replicas>2").unwrap();
//! let trace = selector.matches_with_trace(&Set::new().with("tier", "web"));
//!
//! assert!(!trace.matched);
//! assert_eq!(trace.failed().map(|r| r.key.as_str()).collect::<Vec<_>>(), ["replicas"]);
//! ```

use std::fmt;

/// Outcome of one requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RequirementTrace {
    /// Canonical rendering of the requirement (e.g. `"tier in (api,web)"`).
    pub requirement: String,
    /// The key the requirement looked up.
    pub key: String,
    /// The label value found for the key, `None` when absent.
    pub label: Option<String>,
    /// Whether the requirement matched.
    pub matched: bool,
}

/// Outcome of a whole selector.
///
/// # INV: `matched` == `matches()` result
///
/// Every requirement is evaluated (no short-circuit), but `matched` is still the
/// AND of all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectorTrace {
    /// Whether the selector matched.
    pub matched: bool,
    /// One entry per requirement, in selector order.
    pub requirements: Vec<RequirementTrace>,
    /// The selector was `Nothing`; `requirements` is empty and `matched` is false.
    pub nothing: bool,
}

impl SelectorTrace {
    /// The requirements that did not match.
    pub fn failed(&self) -> impl Iterator<Item = &RequirementTrace> {
        self.requirements.iter().filter(|r| !r.matched)
    }
}

impl fmt::Display for RequirementTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.matched { "match" } else { "no match" };
        match &self.label {
            Some(value) => write!(f, "{}: {verdict} ({}={value:?})", self.requirement, self.key),
            None => write!(f, "{}: {verdict} ({} unset)", self.requirement, self.key),
        }
    }
}

impl fmt::Display for SelectorTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nothing {
            return writeln!(f, "(nothing): no match");
        }
        if self.requirements.is_empty() {
            return writeln!(f, "(everything): match");
        }
        for r in &self.requirements {
            writeln!(f, "{r}")?;
        }
        writeln!(
            f,
            "=> {}",
            if self.matched { "match" } else { "no match" }
        )
    }
}
