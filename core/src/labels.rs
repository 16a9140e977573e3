//! `Labels` — The label-map collaborator that selectors match against
//!
//! Matching only ever asks two questions of a label container: is this key set,
//! and what is its value. Any map can answer them; [`Set`] is the concrete,
//! ordered map the crate ships for building labels and exact-match selectors.

use crate::{Selector, SelectorError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

/// Read-only view of a string-to-string label map.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use labelsel::Labels;
///
/// fn tier(labels: &impl Labels) -> Option<&str> {
///     labels.get("tier")
/// }
///
/// let mut labels = HashMap::new();
/// labels.insert("tier".to_string(), "frontend".to_string());
///
/// assert_eq!(tier(&labels), Some("frontend"));
/// assert!(Labels::has(&labels, "tier"));
/// assert_eq!(Labels::get(&labels, "missing"), None);
/// ```
///
/// `HashMap` and `BTreeMap` have an inherent `get` returning `Option<&String>`,
/// which wins over the trait method in `map.get(..)`; call through a generic
/// bound or `Labels::get(&map, ..)` as above.
pub trait Labels {
    /// The value for `key`, or `None` when the key is not set.
    fn get(&self, key: &str) -> Option<&str>;

    /// Whether `key` is set, with any value (including the empty string).
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T: Labels + ?Sized> Labels for &T {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }
}

impl<S: BuildHasher> Labels for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl Labels for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// An ordered label map.
///
/// Renders as `k1=v1,k2=v2` with keys in order, which is also a valid selector
/// string for the exact-match selector the set converts to.
///
/// # Example
///
/// ```
/// use labelsel::{Labels, Set};
///
/// let set = Set::new().with("tier", "web").with("app", "shop");
/// assert_eq!(set.to_string(), "app=shop,tier=web");
/// assert!(set.as_selector().matches(&set));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Set {
    labels: BTreeMap<String, String>,
}

impl Set {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key-value pair (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Insert a key-value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.labels.insert(key.into(), value.into())
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Exact-match selector for this set, without validating keys or values.
    ///
    /// An empty set yields [`Selector::everything`].
    #[must_use]
    pub fn as_selector(&self) -> Selector {
        Selector::from_validated_set(self.iter())
    }

    /// Exact-match selector for this set, validating every key and value.
    ///
    /// # Errors
    ///
    /// Returns the first key or value validation failure.
    pub fn as_validated_selector(&self) -> Result<Selector, SelectorError> {
        Selector::validated_from_set(self.iter())
    }
}

impl Labels for Set {
    fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Set {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<S: BuildHasher> From<HashMap<String, String, S>> for Set {
    fn from(map: HashMap<String, String, S>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Set {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self { labels }
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
