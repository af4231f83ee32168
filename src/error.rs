use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowseError>;

/// The query tool printed something that doesn't follow the `-t query`
/// grammar.  We keep the offending line so the error page can point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedOutput {
    /// 1-based line number within the query block, or 0 for an empty block.
    pub line_number: usize,
    pub line: String,
    /// What the parser was looking for when it hit `line`.
    pub expected: &'static str,
}

impl fmt::Display for MalformedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_number == 0 {
            write!(f, "expected {}, but the query output was empty", self.expected)
        } else {
            write!(
                f,
                "line {}: expected {}, got {:?}",
                self.line_number, self.expected, self.line
            )
        }
    }
}

impl std::error::Error for MalformedOutput {}

/// Everything that can go wrong while serving a single request or starting
/// the server.  Request-scoped variants are turned into error pages by the
/// router and never take the server down.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The request path is neither the root nor a `?target` query.
    #[error("no such page")]
    RouteNotFound,

    /// The query tool's output could not be parsed.
    #[error("malformed query output: {0}")]
    MalformedOutput(#[from] MalformedOutput),

    /// The query tool could not be run, exited unsuccessfully, timed out, or
    /// printed nothing.
    #[error("query for {target:?} failed: {reason}")]
    QueryToolFailure { target: String, reason: String },

    /// The query tool ran but doesn't know the requested node.
    #[error("unknown target {0:?}")]
    UnknownTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrowseError {
    pub fn query_failure(target: &str, reason: impl Into<String>) -> BrowseError {
        BrowseError::QueryToolFailure {
            target: target.to_string(),
            reason: reason.into(),
        }
    }
}
