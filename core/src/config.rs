//! Config types for structured selector construction.
//!
//! Selectors usually travel as strings, but configuration files often spell them
//! out as data. [`SelectorConfig`] is that data form; [`to_selector()`](SelectorConfig::to_selector)
//! turns it into a runtime [`Selector`] with the same validation the parser applies.
//!
//! ```yaml
//! match_labels:
//!   app: shop
//! match_expressions:
//!   - { key: tier, operator: In, values: [web, api] }
//!   - { key: canary, operator: DoesNotExist }
//! ```
//!
//! | Config type | Runtime type | Conversion |
//! |-------------|-------------|------------|
//! | [`SelectorConfig`] | [`Selector`] | `SelectorConfig::to_selector()` |
//! | [`RequirementConfig`] | [`Requirement`] | `RequirementConfig::to_requirement()` |
//!
//! [`Selector`] and [`Requirement`] themselves (de)serialize as their canonical
//! string. `Nothing` has no string form of its own: it serializes as `""`, which
//! reads back as `Everything`.

use crate::{Operator, Requirement, Selector, SelectorError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Configuration for a [`Selector`].
///
/// `match_labels` entries become `Equals` requirements; `match_expressions`
/// are added as-is. Both default to empty, and an empty config is `Everything`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Exact key/value pairs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,

    /// Set-based and existence requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<RequirementConfig>,
}

/// Configuration for a [`Requirement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementConfig {
    /// The label key.
    pub key: String,

    /// Operator name or token (`In`, `notin`, `Gt`, `!=`, ...).
    pub operator: Operator,

    /// Values; omit for `Exists` / `DoesNotExist`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl RequirementConfig {
    /// Validate and build the runtime requirement.
    ///
    /// # Errors
    ///
    /// Any error [`Requirement::new`] reports.
    pub fn to_requirement(&self) -> Result<Requirement, SelectorError> {
        Requirement::new(self.key.as_str(), self.operator, self.values.iter().map(String::as_str))
    }
}

impl SelectorConfig {
    /// Validate and build the runtime selector.
    ///
    /// # Errors
    ///
    /// The first invalid label pair or expression, in that order.
    pub fn to_selector(&self) -> Result<Selector, SelectorError> {
        let labels = Selector::validated_from_set(&self.match_labels)?;
        let expressions = self
            .match_expressions
            .iter()
            .map(RequirementConfig::to_requirement)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels.add(expressions))
    }
}

impl From<&Requirement> for RequirementConfig {
    fn from(r: &Requirement) -> Self {
        Self {
            key: r.key().to_owned(),
            operator: r.operator(),
            values: r.raw_values().to_vec(),
        }
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        crate::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut reqs = crate::parse_to_requirements(&text).map_err(serde::de::Error::custom)?;
        match reqs.len() {
            1 => Ok(reqs.remove(0)),
            n => Err(serde::de::Error::custom(format!(
                "expected exactly one requirement, found {n} in {text:?}"
            ))),
        }
    }
}
