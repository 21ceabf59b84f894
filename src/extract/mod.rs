//! Code-blob extraction from free-form model output.
//!
//! Code agents ask the model to wrap executable code between a pair of markers,
//! typically a fenced block (```` ```python ... ``` ````) or explicit tags
//! (`<code> ... </code>`). [`BlobExtractor`] finds every such region, trims
//! each payload and joins them in source order with a blank line.
//!
//! Models are not always consistent about the markers they use, so the
//! extractor can fall back to other shapes of output, controlled by
//! [`FallbackPolicy`]:
//!
//! - **Markdown fences** (on by default) - when the requested markers are absent,
//!   a ```` ```python ```` / ```` ```py ```` fenced block is accepted instead.
//! - **Raw code** (opt-in) - when no markers or fences are present at all and
//!   the text starts like a code statement, the whole trimmed text is the payload.
//!
//! If nothing applies, a [`BlobkitError::FormatError`] is returned whose message
//! is suitable as corrective feedback for the model.
//!
//! # Example
//!
//! ```rust
//! use blobkit::extract::{BlobExtractor, DelimiterPair};
//!
//! let extractor = BlobExtractor::new(DelimiterPair::code_tags()).unwrap();
//! let text = "Thought: import numpy\n<code>\nimport numpy as np\n</code>";
//! assert_eq!(extractor.extract(text).unwrap(), "import numpy as np");
//! ```
//!
//! The extractor holds only compiled patterns, so a single instance can be
//! shared between threads.

pub mod fallback;
pub mod json;

use std::fmt;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::utils::logging::preview;
use crate::{BlobkitError, Result};

pub use json::{parse_json_blob, JsonBlob, JsonExtractor};

/// Separator placed between payloads when several blobs are found
pub const BLOB_SEPARATOR: &str = "\n\n";

/// Open/close markers delimiting a payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelimiterPair {
    open: String,
    close: String,
}

impl DelimiterPair {
    /// Create a delimiter pair. Both markers must be non-empty.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self> {
        let open = open.into();
        let close = close.into();

        if open.is_empty() {
            return Err(BlobkitError::invalid_input("Open marker cannot be empty"));
        }
        if close.is_empty() {
            return Err(BlobkitError::invalid_input("Close marker cannot be empty"));
        }

        Ok(Self { open, close })
    }

    /// ```` ```python ```` ... ```` ``` ````
    pub fn python_fence() -> Self {
        Self {
            open: "```python".to_string(),
            close: "```".to_string(),
        }
    }

    /// `<code>` ... `</code>`
    pub fn code_tags() -> Self {
        Self {
            open: "<code>".to_string(),
            close: "</code>".to_string(),
        }
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// Pattern matching one delimited region, capturing the payload.
    ///
    /// Markers are literal text; the payload may span lines and is matched
    /// non-greedily so consecutive regions stay separate.
    fn pattern(&self) -> Result<Regex> {
        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(&self.open),
            regex::escape(&self.close)
        );
        Ok(Regex::new(&pattern)?)
    }
}

impl Default for DelimiterPair {
    fn default() -> Self {
        Self::python_fence()
    }
}

impl fmt::Display for DelimiterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(.*?){}", self.open, self.close)
    }
}

/// Which alternative output shapes are accepted when the markers are missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Accept a markdown python fence in place of the requested markers
    pub markdown_fences: bool,
    /// Accept un-fenced text that starts like code as a single payload
    pub raw_code: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            markdown_fences: true,
            raw_code: false,
        }
    }
}

impl FallbackPolicy {
    /// Only the requested markers are accepted
    pub fn strict() -> Self {
        Self {
            markdown_fences: false,
            raw_code: false,
        }
    }

    /// Every fallback enabled
    pub fn lenient() -> Self {
        Self {
            markdown_fences: true,
            raw_code: true,
        }
    }
}

/// Extracts delimited code blobs from model output
#[derive(Debug, Clone)]
pub struct BlobExtractor {
    delimiters: DelimiterPair,
    pattern: Regex,
    fallback: FallbackPolicy,
}

impl BlobExtractor {
    /// Create an extractor for `delimiters` with the default fallback policy
    pub fn new(delimiters: DelimiterPair) -> Result<Self> {
        let pattern = delimiters.pattern()?;
        Ok(Self {
            delimiters,
            pattern,
            fallback: FallbackPolicy::default(),
        })
    }

    /// Replace the fallback policy
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Build an extractor from the `[extraction]` configuration section
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self::new(config.delimiters()?)?.with_fallback(config.fallback()))
    }

    pub fn delimiters(&self) -> &DelimiterPair {
        &self.delimiters
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Extract every payload, in order of appearance.
    ///
    /// Each payload is trimmed; a region containing only whitespace yields an
    /// empty string. Fails with `FormatError` when neither the markers nor an
    /// enabled fallback match.
    pub fn extract_all(&self, text: &str) -> Result<Vec<String>> {
        let segments = capture_segments(&self.pattern, text);
        if !segments.is_empty() {
            debug!(
                matches = segments.len(),
                delimiters = %self.delimiters,
                "Extracted code blobs"
            );
            return Ok(segments);
        }

        if self.fallback.markdown_fences {
            let segments = fallback::markdown_segments(text);
            if !segments.is_empty() {
                info!(
                    matches = segments.len(),
                    "Requested markers not found, using markdown code fences"
                );
                return Ok(segments);
            }
        }

        if self.fallback.raw_code && fallback::looks_like_raw_code(text, &self.delimiters) {
            info!("No delimiters found, treating the whole output as code");
            return Ok(vec![text.trim().to_string()]);
        }

        warn!(
            delimiters = %self.delimiters,
            output = %preview(text),
            "No code blob found in model output"
        );
        Err(missing_blob_error(text, &self.delimiters))
    }

    /// Extract every payload and join them with a blank line
    pub fn extract(&self, text: &str) -> Result<String> {
        Ok(self.extract_all(text)?.join(BLOB_SEPARATOR))
    }
}

/// Extract code blobs delimited by `delimiters` with the default fallback policy.
///
/// Convenience wrapper around [`BlobExtractor`]; build an extractor once when
/// parsing many outputs with the same markers.
pub fn parse_code_blobs(text: &str, delimiters: &DelimiterPair) -> Result<String> {
    BlobExtractor::new(delimiters.clone())?.extract(text)
}

/// Trimmed first capture group of every non-overlapping match
pub(crate) fn capture_segments(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|payload| payload.as_str().trim().to_string())
        .collect()
}

fn missing_blob_error(text: &str, delimiters: &DelimiterPair) -> BlobkitError {
    let open = delimiters.open();
    let close = delimiters.close();

    let guidance = if text.contains("final") && text.contains("answer") {
        format!(
            "It seems like you're trying to return the final answer, you can do it as follows:\n\
             {open}\n\
             final_answer(\"YOUR FINAL ANSWER HERE\")\n\
             {close}"
        )
    } else {
        format!(
            "Make sure to include code with the correct pattern, for instance:\n\
             Thoughts: Your thoughts\n\
             {open}\n\
             # Your python code here\n\
             {close}"
        )
    };

    BlobkitError::format_error(format!(
        "Your code snippet is invalid, because the regex pattern {delimiters} was not found in it.\n\
         Here is your code snippet:\n\
         {text}\n\
         {guidance}"
    ))
}
