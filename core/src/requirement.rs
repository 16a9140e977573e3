//! `Requirement` — One validated `(key, operator, values)` predicate
//!
//! A requirement is the atom of a selector. It is checked once, when built, and
//! never changes afterwards; [`Requirement::matches`] is therefore total.

use crate::validation::{is_qualified_name, is_valid_label_value};
use crate::{Labels, Operator, SelectorError};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single selector predicate over one label key.
///
/// # INV: valid by construction
///
/// The only public constructor is [`Requirement::new`], which rejects invalid
/// keys, invalid values and wrong operator arity. Values are deduplicated; the
/// first occurrence keeps its position.
///
/// # Example
///
/// ```
/// use labelsel::{Operator, Requirement, Set};
///
/// let req = Requirement::new("tier", Operator::In, ["web", "api"]).unwrap();
/// assert!(req.matches(&Set::new().with("tier", "api")));
/// assert!(!req.matches(&Set::new().with("tier", "db")));
/// assert_eq!(req.to_string(), "tier in (api,web)");
/// ```
///
/// # INV: equality is set equality
///
/// Two requirements are equal when key, operator and the *set* of values agree;
/// the stored value order does not take part in `==` or `Hash`.
#[derive(Debug, Clone)]
pub struct Requirement {
    key: String,
    operator: Operator,
    // Almost always a single value; a Vec beats a set at that size.
    values: Vec<String>,
}

impl Requirement {
    /// Build a requirement, validating it.
    ///
    /// Arity by operator:
    ///
    /// | Operator | Values |
    /// |---|---|
    /// | `In`, `NotIn` | at least one |
    /// | `Equals`, `DoubleEquals`, `NotEquals` | exactly one |
    /// | `Exists`, `DoesNotExist` | none |
    /// | `GreaterThan`, `LessThan` | exactly one, a base-10 `i64` |
    ///
    /// The empty string is a valid value.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::InvalidKey`] if `key` is not a qualified name
    /// - an arity error ([`SelectorError::EmptyValueSet`], [`SelectorError::ExactMatchArity`],
    ///   [`SelectorError::UnaryHasValues`], [`SelectorError::OrderingArity`])
    /// - [`SelectorError::NonIntegerOperand`] for `>` / `<` with a non-integer value
    /// - [`SelectorError::InvalidValue`] for the first value with invalid syntax
    pub fn new<K, I, V>(key: K, operator: Operator, values: I) -> Result<Self, SelectorError>
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        validate_key(&key)?;

        let mut seen = HashSet::new();
        let deduped: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|value: &String| seen.insert(value.clone()))
            .collect();

        match operator {
            Operator::In | Operator::NotIn if deduped.is_empty() => {
                return Err(SelectorError::EmptyValueSet)
            }
            Operator::Equals | Operator::DoubleEquals | Operator::NotEquals
                if deduped.len() != 1 =>
            {
                return Err(SelectorError::ExactMatchArity)
            }
            Operator::Exists | Operator::DoesNotExist if !deduped.is_empty() => {
                return Err(SelectorError::UnaryHasValues)
            }
            Operator::GreaterThan | Operator::LessThan => {
                if deduped.len() != 1 {
                    return Err(SelectorError::OrderingArity);
                }
                if deduped[0].parse::<i64>().is_err() {
                    return Err(SelectorError::NonIntegerOperand {
                        value: deduped[0].clone(),
                    });
                }
            }
            _ => {}
        }

        for value in &deduped {
            validate_value(&key, value)?;
        }

        Ok(Self {
            key,
            operator,
            values: deduped,
        })
    }

    /// Build an `Equals` requirement without any validation.
    ///
    /// Only for callers that have already validated the pair.
    pub(crate) fn equals_unchecked(key: String, value: String) -> Self {
        Self {
            key,
            operator: Operator::Equals,
            values: vec![value],
        }
    }

    /// The label key this requirement constrains.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The operator relating key and values.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The values as a set.
    #[must_use]
    pub fn values(&self) -> BTreeSet<&str> {
        self.values.iter().map(String::as_str).collect()
    }

    /// The values in stored order.
    #[must_use]
    pub fn raw_values(&self) -> &[String] {
        &self.values
    }

    /// Evaluate this requirement against a label map.
    ///
    /// | Operator | Matches when |
    /// |---|---|
    /// | `Equals`, `DoubleEquals`, `In` | key present and its value is one of the values |
    /// | `NotEquals`, `NotIn` | key absent, or its value is none of the values |
    /// | `Exists` | key present |
    /// | `DoesNotExist` | key absent |
    /// | `GreaterThan`, `LessThan` | key present, both sides parse as `i64`, comparison holds |
    ///
    /// A label value that is not an integer makes an ordering requirement false,
    /// never an error.
    pub fn matches<L: Labels + ?Sized>(&self, labels: &L) -> bool {
        match self.operator {
            Operator::In | Operator::Equals | Operator::DoubleEquals => labels
                .get(&self.key)
                .is_some_and(|value| self.has_value(value)),
            Operator::NotIn | Operator::NotEquals => labels
                .get(&self.key)
                .map_or(true, |value| !self.has_value(value)),
            Operator::Exists => labels.has(&self.key),
            Operator::DoesNotExist => !labels.has(&self.key),
            Operator::GreaterThan | Operator::LessThan => {
                let Some(label) = labels.get(&self.key) else {
                    return false;
                };
                let Ok(actual) = label.parse::<i64>() else {
                    return false;
                };
                let [operand] = self.values.as_slice() else {
                    return false;
                };
                let Ok(operand) = operand.parse::<i64>() else {
                    return false;
                };
                if self.operator == Operator::GreaterThan {
                    actual > operand
                } else {
                    actual < operand
                }
            }
        }
    }

    fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.operator == other.operator
            && sorted(&self.values) == sorted(&other.values)
    }
}

impl Eq for Requirement {}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.operator.hash(state);
        sorted(&self.values).hash(state);
    }
}

impl fmt::Display for Requirement {
    /// Canonical form: `!key`, `key`, `key=v`, `key in (a,b)`. Multi-value lists are
    /// sorted for output only; the stored order is left alone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator == Operator::DoesNotExist {
            f.write_str("!")?;
        }
        f.write_str(&self.key)?;

        match self.operator {
            Operator::Exists | Operator::DoesNotExist => return Ok(()),
            Operator::In | Operator::NotIn => write!(f, " {} (", self.operator)?,
            op => f.write_str(op.as_str())?,
        }

        f.write_str(&sorted(&self.values).join(","))?;

        if self.operator.is_set_based() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Sorted view of `values`, copying only when they are out of order.
fn sorted(values: &[String]) -> Cow<'_, [String]> {
    if values.windows(2).all(|w| w[0] <= w[1]) {
        Cow::Borrowed(values)
    } else {
        let mut out = values.to_vec();
        out.sort();
        Cow::Owned(out)
    }
}

pub(crate) fn validate_key(key: &str) -> Result<(), SelectorError> {
    let reasons = is_qualified_name(key);
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(SelectorError::InvalidKey {
            key: key.to_owned(),
            reasons,
        })
    }
}

pub(crate) fn validate_value(key: &str, value: &str) -> Result<(), SelectorError> {
    let reasons = is_valid_label_value(value);
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(SelectorError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
            reasons,
        })
    }
}
