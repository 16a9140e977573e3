//! `Operator` — The closed relational vocabulary of the selector grammar

use crate::SelectorError;
use std::fmt;
use std::str::FromStr;

/// Relation between a requirement's key and its values.
///
/// The set is closed: the grammar, the arity rules in
/// [`Requirement::new`](crate::Requirement::new) and the matching table all
/// enumerate exactly these nine cases.
///
/// # Example
///
/// ```
/// use labelsel::Operator;
///
/// assert_eq!("notin".parse::<Operator>().unwrap(), Operator::NotIn);
/// assert_eq!("Gt".parse::<Operator>().unwrap(), Operator::GreaterThan);
/// assert_eq!(Operator::NotEquals.to_string(), "!=");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Operator {
    /// Key present, any value.
    Exists,
    /// Key absent.
    DoesNotExist,
    /// `=` — key present with the single value.
    Equals,
    /// `==` — same as `=`, kept distinct for rendering.
    DoubleEquals,
    /// `!=` — key absent, or present with a different value.
    NotEquals,
    /// `in` — key present with one of the values.
    In,
    /// `notin` — key absent, or present with none of the values.
    NotIn,
    /// `>` — key present with an integer value greater than the operand.
    GreaterThan,
    /// `<` — key present with an integer value less than the operand.
    LessThan,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 9] = [
        Self::Exists,
        Self::DoesNotExist,
        Self::Equals,
        Self::DoubleEquals,
        Self::NotEquals,
        Self::In,
        Self::NotIn,
        Self::GreaterThan,
        Self::LessThan,
    ];

    /// The operator's token in selector text.
    ///
    /// `Exists` has no token of its own (a bare key implies it); `"exists"` is
    /// returned so every operator has a printable name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::DoesNotExist => "!",
            Self::Equals => "=",
            Self::DoubleEquals => "==",
            Self::NotEquals => "!=",
            Self::In => "in",
            Self::NotIn => "notin",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        }
    }

    /// `in` or `notin`.
    #[must_use]
    pub fn is_set_based(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// `=`, `==` or `!=`.
    #[must_use]
    pub fn is_exact(self) -> bool {
        matches!(self, Self::Equals | Self::DoubleEquals | Self::NotEquals)
    }

    /// `>` or `<`.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan)
    }

    /// `exists` or `!` — operators that take no values.
    #[must_use]
    pub fn is_unary(self) -> bool {
        matches!(self, Self::Exists | Self::DoesNotExist)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = SelectorError;

    /// Accepts selector tokens (`=`, `notin`, `>`) and the long names used in
    /// structured config (`In`, `DoesNotExist`, `Gt`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "exists" => Self::Exists,
            "!" | "doesnotexist" => Self::DoesNotExist,
            "=" | "equals" => Self::Equals,
            "==" | "doubleequals" => Self::DoubleEquals,
            "!=" | "notequals" => Self::NotEquals,
            "in" => Self::In,
            "notin" => Self::NotIn,
            ">" | "gt" | "greaterthan" => Self::GreaterThan,
            "<" | "lt" | "lessthan" => Self::LessThan,
            _ => {
                return Err(SelectorError::UnknownOperator {
                    operator: s.to_owned(),
                })
            }
        };
        Ok(op)
    }
}

/// Deserializes through [`FromStr`], so configs accept every spelling the
/// parser's operator names do. Serializes as the variant name.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
