//! Identifier validation for generated source code.
//!
//! Tool names and attribute names end up spliced into generated Python source
//! (`name = value` keyword arguments, class attributes, function names). A name
//! that is not an identifier, or that is a reserved keyword such as `class`,
//! produces a syntax error downstream, so callers check candidates here first.
//!
//! Candidates often come from loosely typed data (a deserialized agent
//! definition, tool metadata), so the entry point takes a [`NameCandidate`]
//! rather than a `&str`. Anything that is not text is simply not a valid name.
//!
//! ```rust
//! use blobkit::names::is_valid_name;
//! use serde_json::json;
//!
//! assert!(is_valid_name("valid_name"));
//! assert!(!is_valid_name("123invalid"));
//! assert!(!is_valid_name("class"));
//! assert!(!is_valid_name(&json!(123)));
//! assert!(!is_valid_name(None::<&str>));
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_ident::{is_xid_continue, is_xid_start};

use crate::{BlobkitError, Result};

/// Reserved (hard) keywords of the target language.
///
/// Soft keywords (`match`, `case`, `type`, `_`) are usable as names and are
/// intentionally absent.
pub const PYTHON_KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

static KEYWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PYTHON_KEYWORDS.iter().copied().collect());

/// A value that may or may not be usable as a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCandidate {
    /// Textual candidate, subject to identifier and keyword checks
    Text(String),
    /// Any non-text value (number, null, list, mapping, ...)
    Other,
}

impl From<&str> for NameCandidate {
    fn from(value: &str) -> Self {
        NameCandidate::Text(value.to_string())
    }
}

impl From<String> for NameCandidate {
    fn from(value: String) -> Self {
        NameCandidate::Text(value)
    }
}

impl From<&String> for NameCandidate {
    fn from(value: &String) -> Self {
        NameCandidate::Text(value.clone())
    }
}

impl<T: Into<NameCandidate>> From<Option<T>> for NameCandidate {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(NameCandidate::Other)
    }
}

impl From<&serde_json::Value> for NameCandidate {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => NameCandidate::Text(s.clone()),
            _ => NameCandidate::Other,
        }
    }
}

/// Check whether a candidate can be used as a name in generated source.
///
/// Returns `true` iff the candidate is text, is a lexical identifier and is not
/// a reserved keyword. Never fails.
pub fn is_valid_name(candidate: impl Into<NameCandidate>) -> bool {
    match candidate.into() {
        NameCandidate::Text(name) => is_identifier(&name) && !is_keyword(&name),
        NameCandidate::Other => false,
    }
}

/// Lexical identifier check: an `XID_Start` character or `_`, then
/// `XID_Continue` characters.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_xid_start(first) || first == '_' => chars.all(is_xid_continue),
        _ => false,
    }
}

/// Whether `name` is a reserved keyword
pub fn is_keyword(name: &str) -> bool {
    KEYWORD_SET.contains(name)
}

/// Validate a name, reporting which rule it breaks.
///
/// # Returns
/// * `Result<()>` - Ok if valid, `InvalidInput` describing the problem otherwise
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BlobkitError::invalid_input("Name cannot be empty"));
    }

    if !is_identifier(name) {
        return Err(BlobkitError::invalid_input(format!(
            "'{}' is not an identifier: it must start with a letter or underscore \
             and contain only letters, digits and underscores",
            name
        )));
    }

    if is_keyword(name) {
        return Err(BlobkitError::invalid_input(format!(
            "'{}' is a reserved keyword",
            name
        )));
    }

    Ok(())
}
