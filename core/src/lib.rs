//! labelsel - label selector grammar, parser and matching engine
//!
//! A label selector is a small query language over a string-to-string label map.
//! A selector is a conjunction of requirements, each relating one key to a set of
//! values through an operator:
//!
//! ```text
//! environment in (production, qa), tier notin (frontend), partition, !canary, replicas>2
//! ```
//!
//! # Architecture
//!
//! - [`Lexer`] — Raw selector text into a finite stream of [`ScannedItem`]s
//! - [`parse`] — Recursive descent over the buffered stream, context-sensitive keywords
//! - [`Requirement`] — Validated, immutable `(key, operator, values)` predicate
//! - [`Selector`] — AND of requirements, plus the `Everything` / `Nothing` variants
//! - [`Labels`] — The two-method collaborator every label container implements
//!
//! # Key Invariants
//!
//! 1. **A `Requirement` that exists is valid**: key syntax, value syntax and operator
//!    arity are checked once, at construction.
//!
//! 2. **Matching is total**: `matches()` never fails. An ordering operator against a
//!    non-integer label value is simply no match.
//!
//! 3. **Selectors are persistent**: [`Selector::add`] returns a new selector and leaves
//!    the receiver untouched.
//!
//! # Example
//!
//! ```
//! use labelsel::prelude::*;
//!
//! let selector = labelsel::parse("env in (prod, qa), !canary, replicas>2").unwrap();
//!
//! let labels = Set::new().with("env", "prod").with("replicas", "3");
//! assert!(selector.matches(&labels));
//!
//! let labels = Set::new().with("env", "prod").with("canary", "true");
//! assert!(!selector.matches(&labels));
//!
//! assert_eq!(selector.to_string(), "!canary,env in (prod,qa),replicas>2");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod labels;
mod lexer;
mod operator;
mod parser;
mod requirement;
mod selector;
mod trace;
pub mod validation;

#[cfg(feature = "serde")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use labels::{Labels, Set};
pub use lexer::{Lexer, ScannedItem, Token};
pub use operator::Operator;
pub use parser::{parse, parse_to_requirements, ParserContext};
pub use requirement::Requirement;
pub use selector::Selector;
pub use trace::{RequirementTrace, SelectorTrace};

#[cfg(feature = "serde")]
pub use config::{RequirementConfig, SelectorConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use labelsel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Core types
        Labels,
        Operator,
        Requirement,
        // Trace types
        RequirementTrace,
        Selector,
        // Errors
        SelectorError,
        SelectorTrace,
        Set,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length of the name segment of a qualified key, and of a label value.
pub const MAX_NAME_LENGTH: usize = 63;

/// Maximum length of the optional DNS subdomain prefix of a qualified key.
pub const MAX_PREFIX_LENGTH: usize = 253;

/// Maximum length of a label value.
pub const MAX_VALUE_LENGTH: usize = 63;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from selector parsing and requirement construction.
///
/// Two kinds exist: syntax errors (the token sequence does not follow the grammar)
/// and validation errors (well-formed, but a key, value or operand is invalid).
/// Use [`is_syntax`](Self::is_syntax) / [`is_validation`](Self::is_validation) to
/// tell them apart. Parsing is all-or-nothing: no partial selector accompanies an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// A token appeared where the grammar does not allow it.
    #[error("{message}")]
    Syntax {
        /// Diagnostic naming the found and expected tokens.
        message: String,
    },

    /// The lexer could not match a run of operator characters.
    #[error("{literal}")]
    Lex {
        /// The diagnostic literal carried by the error token.
        literal: String,
    },

    /// The key is not a qualified name.
    #[error("invalid label key {key:?}: {}", .reasons.join("; "))]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Every rule the key violates.
        reasons: Vec<String>,
    },

    /// A value is not a valid label value.
    #[error("invalid label value: {value:?}: at key: {key:?}: {}", .reasons.join("; "))]
    InvalidValue {
        /// The key the value belongs to.
        key: String,
        /// The offending value.
        value: String,
        /// Every rule the value violates.
        reasons: Vec<String>,
    },

    /// `in` / `notin` with no values.
    #[error("for 'in', 'notin' operators, values set can't be empty")]
    EmptyValueSet,

    /// `=`, `==` or `!=` with other than one value.
    #[error("exact-match compatibility requires one single value")]
    ExactMatchArity,

    /// `exists` / `!` with values.
    #[error("values set must be empty for exists and does not exist")]
    UnaryHasValues,

    /// `>` / `<` with other than one value.
    #[error("for 'Gt', 'Lt' operators, exactly one value is required")]
    OrderingArity,

    /// `>` / `<` with a value that is not a base-10 `i64`.
    #[error("for 'Gt', 'Lt' operators, the value must be an integer, found {value:?}")]
    NonIntegerOperand {
        /// The offending operand.
        value: String,
    },

    /// Operator text outside the vocabulary.
    #[error("operator {operator:?} is not recognized")]
    UnknownOperator {
        /// The unrecognized text.
        operator: String,
    },

    /// Failure inside a single requirement of a selector string.
    #[error("unable to parse requirement: {0}")]
    InRequirement(Box<SelectorError>),
}

impl SelectorError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Returns `true` for lexical and grammar errors.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        match self {
            Self::Syntax { .. } | Self::Lex { .. } => true,
            Self::InRequirement(inner) => inner.is_syntax(),
            _ => false,
        }
    }

    /// Returns `true` for key, value, arity and operand errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !self.is_syntax()
    }
}
