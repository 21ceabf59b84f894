//! Embedded JSON extraction.
//!
//! Tool-calling agents ask the model for a JSON object but models rarely return
//! only that: there is usually some reasoning before the object and sometimes
//! a sentence after it. [`JsonExtractor`] decodes the object starting at the
//! first `{`, returns the text before it as the prefix, and discards whatever
//! follows the object's closing brace.
//!
//! Decoding uses [`serde_json::StreamDeserializer`], which stops after one
//! complete value instead of requiring the rest of the input to be JSON.
//!
//! ```rust
//! use blobkit::extract::parse_json_blob;
//! use serde_json::json;
//!
//! let (value, prefix) =
//!     parse_json_blob(r#"With text before{"simple": "json"}And text after"#).unwrap();
//! assert_eq!(value, json!({"simple": "json"}));
//! assert_eq!(prefix, "With text before");
//! ```

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::JsonConfig;
use crate::utils::logging::preview;
use crate::{BlobkitError, Result};

/// A JSON object found in model output, with the text that preceded it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonBlob {
    /// Text before the opening `{`, untouched
    pub prefix: String,
    /// Decoded object
    pub value: Value,
}

impl JsonBlob {
    pub fn into_parts(self) -> (Value, String) {
        (self.value, self.prefix)
    }
}

/// Decodes the first JSON object embedded in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonExtractor {
    lenient_strings: bool,
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self {
            lenient_strings: true,
        }
    }
}

impl JsonExtractor {
    /// Extractor that tolerates raw control characters inside string literals
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor that rejects raw control characters inside string literals
    pub fn strict() -> Self {
        Self {
            lenient_strings: false,
        }
    }

    /// Build an extractor from the `[json]` configuration section
    pub fn from_config(config: &JsonConfig) -> Self {
        Self {
            lenient_strings: config.lenient_strings,
        }
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient_strings
    }

    /// Decode the JSON object starting at the first `{` of `text`.
    ///
    /// Fails with `FormatError` when there is no `{` or when the text from
    /// there on does not start with a valid JSON object.
    pub fn extract(&self, text: &str) -> Result<JsonBlob> {
        let start = text.find('{').ok_or_else(|| {
            warn!(output = %preview(text), "No JSON object found in model output");
            BlobkitError::format_error(format!(
                "The JSON blob you used is invalid: no JSON object was found, \
                 expected an opening '{{'.\nJSON blob was: {}",
                text
            ))
        })?;

        let candidate = if self.lenient_strings {
            escape_control_characters(&text[start..])
        } else {
            Cow::Borrowed(&text[start..])
        };

        let mut stream = serde_json::Deserializer::from_str(&candidate).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                debug!(
                    prefix_len = start,
                    consumed = stream.byte_offset(),
                    discarded = candidate.len() - stream.byte_offset(),
                    "Decoded embedded JSON object"
                );
                Ok(JsonBlob {
                    prefix: text[..start].to_string(),
                    value,
                })
            }
            Some(Err(error)) => {
                warn!(error = %error, output = %preview(text), "Invalid JSON blob in model output");
                Err(invalid_json_error(&text[start..], &candidate, &error))
            }
            None => Err(BlobkitError::internal_error(
                "JSON decoder produced no value for input starting with '{'",
            )),
        }
    }
}

/// Decode the first embedded JSON object with the default (lenient) extractor.
///
/// Returns the decoded value and the text preceding it.
pub fn parse_json_blob(text: &str) -> Result<(Value, String)> {
    JsonExtractor::new().extract(text).map(JsonBlob::into_parts)
}

/// Escape raw control characters that appear inside JSON string literals.
///
/// Models often emit literal newlines or tabs inside strings (multi-line code
/// arguments). Text outside string literals is left as is.
fn escape_control_characters(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }

    let mut output = String::with_capacity(input.len() + 16);
    let mut state = StringScanner::default();
    for ch in input.chars() {
        state.push(ch, &mut output);
    }

    Cow::Owned(output)
}

/// Tracks whether the scan is inside a JSON string literal
#[derive(Debug, Default)]
struct StringScanner {
    in_string: bool,
    escaped: bool,
}

impl StringScanner {
    /// Append `ch` to `output`, escaping it if it is a raw control character
    /// inside a string literal
    fn push(&mut self, ch: char, output: &mut String) {
        if !self.in_string {
            if ch == '"' {
                self.in_string = true;
            }
            output.push(ch);
            return;
        }

        if self.escaped {
            self.escaped = false;
            output.push(ch);
            return;
        }

        match ch {
            '\\' => {
                self.escaped = true;
                output.push(ch);
            }
            '"' => {
                self.in_string = false;
                output.push(ch);
            }
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if (c as u32) < 0x20 => output.push_str(&format!("\\u{:04x}", c as u32)),
            c => output.push(c),
        }
    }
}

/// Map a byte offset in the escaped text back to the original text
fn original_offset(original: &str, escaped_offset: usize) -> usize {
    let mut state = StringScanner::default();
    let mut scratch = String::new();
    let mut produced = 0;

    for (index, ch) in original.char_indices() {
        if produced >= escaped_offset {
            return index;
        }
        scratch.clear();
        state.push(ch, &mut scratch);
        produced += scratch.len();
    }

    original.len()
}

/// `original` is the model's text from the first `{`; `decoded` is what was
/// handed to the decoder, which differs from it in lenient mode.
fn invalid_json_error(original: &str, decoded: &str, error: &serde_json::Error) -> BlobkitError {
    let mut offset = byte_offset(decoded, error.line(), error.column());
    if decoded.len() != original.len() {
        offset = original_offset(original, offset);
    }
    BlobkitError::format_error(format!(
        "The JSON blob you used is invalid due to the following error: {}.\n\
         JSON blob was: {}, decoding failed on that specific part of the blob:\n'{}'.",
        error,
        original,
        snippet_around(original, offset)
    ))
}

/// Byte offset of a 1-based line / column position reported by serde_json
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column).min(text.len())
}

/// A few characters on each side of `offset`, clamped to char boundaries
fn snippet_around(text: &str, offset: usize) -> &str {
    let mut start = offset.saturating_sub(4);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + 5).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}
