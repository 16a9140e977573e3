//! Key and value syntax rules.
//!
//! Both checks return every violated rule as a human-readable message; an empty
//! vector means the input is valid. Callers treat any message as a hard failure.

use crate::{MAX_NAME_LENGTH, MAX_PREFIX_LENGTH, MAX_VALUE_LENGTH};
use regex::Regex;
use std::sync::LazyLock;

const NAME_FMT: &str = "([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]";
const DNS1123_SUBDOMAIN_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?(\\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_FMT}$")).expect("name pattern compiles"));

static LABEL_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^({NAME_FMT})?$")).expect("label value pattern compiles")
});

static DNS1123_SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{DNS1123_SUBDOMAIN_FMT}$")).expect("subdomain pattern compiles")
});

/// Validate a qualified key: `[prefix/]name`.
///
/// - `name`: 1 to [`MAX_NAME_LENGTH`] characters, alphanumeric at both ends,
///   `-`, `_` and `.` allowed inside.
/// - `prefix` (optional): a lowercase DNS-1123 subdomain of at most
///   [`MAX_PREFIX_LENGTH`] characters.
///
/// ```
/// use labelsel::validation::is_qualified_name;
///
/// assert!(is_qualified_name("app.kubernetes.io/name").is_empty());
/// assert!(!is_qualified_name("-leading-dash").is_empty());
/// ```
#[must_use]
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    let name = match value.split_once('/') {
        None => value,
        Some((prefix, name)) if !name.contains('/') => {
            if prefix.is_empty() {
                errs.push("prefix part must be non-empty".to_owned());
            } else {
                errs.extend(
                    is_dns1123_subdomain(prefix)
                        .into_iter()
                        .map(|msg| format!("prefix part {msg}")),
                );
            }
            name
        }
        Some(_) => {
            errs.push(format!(
                "a qualified name must consist of alphanumeric characters, '-', '_' or '.', \
                 and must start and end with an alphanumeric character (regex used for \
                 validation is '{NAME_FMT}') with an optional DNS subdomain prefix and '/' \
                 (e.g. 'example.com/MyName')"
            ));
            return errs;
        }
    };

    if name.is_empty() {
        errs.push("name part must be non-empty".to_owned());
    } else if name.len() > MAX_NAME_LENGTH {
        errs.push(format!(
            "name part must be no more than {MAX_NAME_LENGTH} characters"
        ));
    }
    if !name.is_empty() && !NAME_RE.is_match(name) {
        errs.push(format!(
            "name part must consist of alphanumeric characters, '-', '_' or '.', and must \
             start and end with an alphanumeric character (e.g. 'MyName', or 'my.name', or \
             '123-abc', regex used for validation is '{NAME_FMT}')"
        ));
    }
    errs
}

/// Validate a label value: empty, or up to [`MAX_VALUE_LENGTH`] characters with
/// the same charset as a key's name part.
///
/// ```
/// use labelsel::validation::is_valid_label_value;
///
/// assert!(is_valid_label_value("").is_empty());
/// assert!(is_valid_label_value("v1.2_beta-3").is_empty());
/// assert!(!is_valid_label_value("has space").is_empty());
/// ```
#[must_use]
pub fn is_valid_label_value(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > MAX_VALUE_LENGTH {
        errs.push(format!("must be no more than {MAX_VALUE_LENGTH} characters"));
    }
    if !LABEL_VALUE_RE.is_match(value) {
        errs.push(format!(
            "a valid label must be an empty string or consist of alphanumeric characters, \
             '-', '_' or '.', and must start and end with an alphanumeric character \
             (e.g. 'MyValue', or 'my_value', or '12345', regex used for validation is \
             '({NAME_FMT})?')"
        ));
    }
    errs
}

/// Validate a lowercase RFC 1123 subdomain.
#[must_use]
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > MAX_PREFIX_LENGTH {
        errs.push(format!("must be no more than {MAX_PREFIX_LENGTH} characters"));
    }
    if !DNS1123_SUBDOMAIN_RE.is_match(value) {
        errs.push(format!(
            "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric \
             characters, '-' or '.', and must start and end with an alphanumeric character \
             (e.g. 'example.com', regex used for validation is '{DNS1123_SUBDOMAIN_FMT}')"
        ));
    }
    errs
}
