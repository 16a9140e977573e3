//! `Selector` — Conjunction of requirements
//!
//! A selector is either an AND of [`Requirement`]s (possibly none, which is
//! `Everything`) or `Nothing`, which no label map satisfies. The two degenerate
//! cases are distinct: `Everything` places no restriction, `Nothing` cannot be
//! satisfied and exposes no requirements.

use crate::requirement::{validate_key, validate_value};
use crate::trace::{RequirementTrace, SelectorTrace};
use crate::{Labels, Operator, Requirement, SelectorError};
use std::fmt;
use std::str::FromStr;

/// A label selector.
///
/// # INV: sorted by key
///
/// Every constructor and [`add`](Self::add) sorts requirements by key.
/// Requirements sharing a key keep their relative order (stable sort), so the
/// rendered string is deterministic.
///
/// # INV: persistent
///
/// No method mutates a selector in place; [`add`](Self::add) returns a new one.
///
/// # Example
///
/// ```
/// use labelsel::{Selector, Set};
///
/// let selector: Selector = "app=shop, tier in (web, api)".parse().unwrap();
/// assert!(selector.matches(&Set::new().with("app", "shop").with("tier", "web")));
/// assert_eq!(selector.requires_exact_match("app"), Some("shop"));
///
/// assert!(Selector::everything().matches(&Set::new()));
/// assert!(!Selector::nothing().matches(&Set::new()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(Inner);

// Private so every construction goes through a sorting constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Inner {
    /// AND of requirements. Empty means `Everything`.
    Requirements(Vec<Requirement>),
    /// Matches no label map.
    Nothing,
}

impl Selector {
    /// A selector that matches every label map.
    #[must_use]
    pub fn everything() -> Self {
        Self(Inner::Requirements(Vec::new()))
    }

    /// A selector that matches no label map.
    #[must_use]
    pub fn nothing() -> Self {
        Self(Inner::Nothing)
    }

    /// Wrap requirements, sorting them by key.
    pub(crate) fn from_requirements(mut requirements: Vec<Requirement>) -> Self {
        sort_by_key(&mut requirements);
        Self(Inner::Requirements(requirements))
    }

    /// An empty selector, equivalent to [`everything`](Self::everything).
    #[must_use]
    pub fn new() -> Self {
        Self::everything()
    }

    /// Parse a selector string. See [`crate::parse`].
    ///
    /// # Errors
    ///
    /// Returns the first syntax or validation error.
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        crate::parse(selector)
    }

    /// Whether every requirement matches `labels`. `Nothing` never matches.
    pub fn matches<L: Labels + ?Sized>(&self, labels: &L) -> bool {
        match &self.0 {
            Inner::Requirements(reqs) => reqs.iter().all(|r| r.matches(labels)),
            Inner::Nothing => false,
        }
    }

    /// Evaluate with a per-requirement trace.
    ///
    /// Unlike [`matches`](Self::matches) this does not short-circuit: every
    /// requirement is evaluated. `trace.matched` equals `matches(labels)`.
    #[must_use]
    pub fn matches_with_trace<L: Labels + ?Sized>(&self, labels: &L) -> SelectorTrace {
        match &self.0 {
            Inner::Requirements(reqs) => {
                let requirements: Vec<RequirementTrace> = reqs
                    .iter()
                    .map(|r| RequirementTrace {
                        requirement: r.to_string(),
                        key: r.key().to_owned(),
                        label: labels.get(r.key()).map(str::to_owned),
                        matched: r.matches(labels),
                    })
                    .collect();
                SelectorTrace {
                    matched: requirements.iter().all(|r| r.matched),
                    requirements,
                    nothing: false,
                }
            }
            Inner::Nothing => SelectorTrace {
                matched: false,
                requirements: Vec::new(),
                nothing: true,
            },
        }
    }

    /// Whether this selector places no restriction.
    ///
    /// `true` for `Everything`; `false` for `Nothing` and for any selector with
    /// requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Inner::Requirements(reqs) => reqs.is_empty(),
            Inner::Nothing => false,
        }
    }

    /// A new selector with `requirements` added, sorted by key.
    ///
    /// The receiver is unchanged. Adding to `Nothing` yields `Nothing`.
    #[must_use]
    pub fn add(&self, requirements: impl IntoIterator<Item = Requirement>) -> Self {
        match &self.0 {
            Inner::Requirements(existing) => {
                let mut reqs = existing.clone();
                reqs.extend(requirements);
                sort_by_key(&mut reqs);
                Self(Inner::Requirements(reqs))
            }
            Inner::Nothing => Self::nothing(),
        }
    }

    /// The requirements, or `None` when the selector is `Nothing` (not selectable).
    ///
    /// `Everything` returns `Some(&[])`.
    #[must_use]
    pub fn requirements(&self) -> Option<&[Requirement]> {
        match &self.0 {
            Inner::Requirements(reqs) => Some(reqs.as_slice()),
            Inner::Nothing => None,
        }
    }

    /// The value `key` is pinned to, if the selector requires one.
    ///
    /// Looks only at the first requirement on `key`: it pins a value when it is
    /// `=`, `==` or a single-valued `in`. Later requirements on the same key are
    /// not consulted.
    ///
    /// ```
    /// use labelsel::Selector;
    ///
    /// let s = Selector::parse("k=v").unwrap();
    /// assert_eq!(s.requires_exact_match("k"), Some("v"));
    ///
    /// let s = Selector::parse("k in (v1,v2)").unwrap();
    /// assert_eq!(s.requires_exact_match("k"), None);
    /// ```
    #[must_use]
    pub fn requires_exact_match(&self, key: &str) -> Option<&str> {
        let first = self.requirements()?.iter().find(|r| r.key() == key)?;
        match (first.operator(), first.raw_values()) {
            (Operator::Equals | Operator::DoubleEquals | Operator::In, [value]) => {
                Some(value.as_str())
            }
            _ => None,
        }
    }

    /// Exact-match selector for a label map, without validation.
    ///
    /// Assumes keys and values are already valid. An empty map yields
    /// [`everything`](Self::everything). Equivalent to
    /// [`from_validated_set`](Self::from_validated_set).
    #[must_use]
    pub fn from_set<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_validated_set(labels)
    }

    /// Exact-match selector for a label map whose keys and values are known to be valid.
    ///
    /// No validation is performed.
    #[must_use]
    pub fn from_validated_set<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut reqs: Vec<Requirement> = labels
            .into_iter()
            .map(|(k, v)| Requirement::equals_unchecked(k.into(), v.into()))
            .collect();
        sort_by_key(&mut reqs);
        Self(Inner::Requirements(reqs))
    }

    /// Exact-match selector for a label map, validating every key and value.
    ///
    /// # Errors
    ///
    /// Returns the first invalid key or value; no selector is built.
    pub fn validated_from_set<K, V>(
        labels: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, SelectorError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut reqs = Vec::new();
        for (k, v) in labels {
            let (key, value) = (k.into(), v.into());
            validate_key(&key)?;
            validate_value(&key, &value)?;
            reqs.push(Requirement::equals_unchecked(key, value));
        }
        sort_by_key(&mut reqs);
        Ok(Self(Inner::Requirements(reqs)))
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::everything()
    }
}

impl fmt::Display for Selector {
    /// Requirements in key order, comma-joined. Both `Everything` and `Nothing`
    /// render as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Inner::Requirements(reqs) = &self.0 else {
            return Ok(());
        };
        for (i, r) in reqs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl FromIterator<Requirement> for Selector {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self::everything().add(iter)
    }
}

fn sort_by_key(reqs: &mut [Requirement]) {
    reqs.sort_by(|a, b| a.key().cmp(b.key()));
}
