//! Registry error definitions.

use std::path::PathBuf;

use http::Method;
use thiserror::Error;

/// Errors raised while registering or resolving stubs.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// More than one registered URI in the same precedence tier matched.
    #[error("More than one registered URI matched this request: {method} {uri} (candidates: {})", .matches.join(", "))]
    MultipleMatches {
        method: Method,
        uri: String,
        matches: Vec<String>,
    },

    #[error("Invalid URI {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        source: url::ParseError,
    },

    #[error("Invalid URI pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// `times` must be a positive integer.
    #[error("times must be positive, got {0}")]
    InvalidTimes(u32),

    #[error("Stub for {0} mixes a response callback with a static response or raise")]
    ConflictingResponse(String),

    #[error("No response options given for {method} {uri}")]
    EmptySequence { method: String, uri: String },

    #[error("Could not read body file {}: {source}", .path.display())]
    BodyFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
