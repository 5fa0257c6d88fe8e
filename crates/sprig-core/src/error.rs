//! Error types for sprig-core

use crate::Method;
use sprig_trie::InsertError;
use thiserror::Error;

/// Result type alias for sprig operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for route registration
///
/// Serving never fails: a request nothing matches goes to the
/// not-found handler instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Empty segment in a route pattern
    #[error("Malformed route {method} {path}: empty token")]
    MalformedPath { method: Method, path: String },

    /// A route already terminates at the same trie node
    #[error("Route conflict: {method} {path}")]
    RouteConflict { method: Method, path: String },
}

impl Error {
    pub(crate) fn from_insert(method: Method, err: InsertError) -> Self {
        match err {
            InsertError::MalformedPath { pattern } => Error::MalformedPath {
                method,
                path: pattern,
            },
            InsertError::RouteConflict { pattern } => Error::RouteConflict {
                method,
                path: pattern,
            },
        }
    }
}
