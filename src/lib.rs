//! Pull code blobs, JSON blobs and safe identifiers out of language model output.
//!
//! Code-writing agents ask a model to answer with executable code between a pair
//! of markers, and tool-calling agents ask for a JSON object. Models follow
//! those instructions loosely: prose around the payload, several blocks in one
//! answer, a markdown fence instead of the requested tags, trailing sentences
//! after the JSON. blobkit turns that text into the payload the agent needs, or
//! into an error message that can be fed back to the model.
//!
//! # Quick Start
//!
//! ```rust
//! use blobkit::extract::{parse_code_blobs, parse_json_blob, DelimiterPair};
//! use blobkit::names::is_valid_name;
//! use serde_json::json;
//!
//! # fn main() -> blobkit::Result<()> {
//! let answer = "Thought: load numpy first.\n<code>\nimport numpy as np\n</code>";
//! let code = parse_code_blobs(answer, &DelimiterPair::code_tags())?;
//! assert_eq!(code, "import numpy as np");
//!
//! let (call, thought) = parse_json_blob(r#"I'll search.{"name": "web_search"} Done."#)?;
//! assert_eq!(call, json!({"name": "web_search"}));
//! assert_eq!(thought, "I'll search.");
//!
//! assert!(is_valid_name(&call["name"]));
//! assert!(!is_valid_name("class"));
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`extract`] - delimited code-blob extraction and its fallbacks
//! - [`extract::json`] - embedded JSON object extraction with prefix capture
//! - [`names`] - identifier validation for generated source code
//! - [`config`] - file and environment configuration
//! - [`telemetry`] - tracing subscriber setup
//! - [`error`] - error type shared by the crate
//!
//! All extraction functions are pure: they borrow the input, keep no state
//! between calls, and can be called from any number of threads at once.

pub mod config;
pub mod error;
pub mod extract;
pub mod names;
pub mod telemetry;
pub mod utils;

pub use error::BlobkitError;
pub use extract::{
    parse_code_blobs, parse_json_blob, BlobExtractor, DelimiterPair, FallbackPolicy, JsonBlob,
    JsonExtractor,
};
pub use names::{is_valid_name, NameCandidate};

pub type Result<T> = std::result::Result<T, BlobkitError>;
