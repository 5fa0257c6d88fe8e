//! sprig-trie: Segment trie for HTTP routes
//!
//! Single Source of Truth (SSOT) for route storage and matching, used by
//! `sprig-core` with one trie per HTTP method.
//!
//! ## Features
//! - One trie level per `/`-separated segment
//! - Literal segments: `/users`, `/api/v1/health`
//! - Named captures: `/users/:id`, `/accounts/:account/invoices/:invoice`
//! - Conflict detection at insertion time
//! - Captured values are byte spans into the looked-up path
//!
//! ## Path Syntax
//! - `:name` - Named capture (exactly one segment)
//! - A single trailing `/` is ignored, any other empty segment is an error
//!
//! ## Priority
//! A literal child always wins over the wildcard child. Once the lookup
//! has descended into a child it never backtracks.
//!
//! ## Example
//! ```
//! use sprig_trie::Node;
//!
//! let mut root = Node::new();
//! root.insert("/users", 0).unwrap();
//! root.insert("/users/:id", 1).unwrap();
//!
//! let m = root.at("/users/123").unwrap();
//! assert_eq!(*m.handler, 1);
//! assert_eq!(m.params, vec![("id", "123")]);
//! ```

pub mod path;

mod node;

pub use node::{Captures, Match, Node};
pub use path::{Segment, Span};

use thiserror::Error;

/// Route insertion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// Empty segment anywhere but the trailing position
    #[error("empty token in route '{pattern}'")]
    MalformedPath { pattern: String },

    /// A route already terminates at the same node
    #[error("conflict adding '{pattern}'")]
    RouteConflict { pattern: String },
}
