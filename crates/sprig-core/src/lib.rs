//! sprig-core: Request routing over per-method segment tries
//!
//! Registration builds one [`sprig_trie::Node`] per HTTP method; dispatch
//! matches a request against it, binds the captured parameters and calls
//! the handler. The router only needs the small [`RequestContext`]
//! capability from a server's request type.
//!
//! ## Features
//! - `http` (default) - conversions from `http::Method` and `http::request::Parts`
//!
//! ## Example
//! ```
//! use sprig_core::{handler_fn, Dispatched, Method, Request, Routable, Router};
//!
//! let mut router: Router<Request> = Router::new();
//! router
//!     .get("/users/:id", handler_fn(|req: &mut Request| {
//!         assert_eq!(req.param("id"), Some("42"));
//!     }))
//!     .unwrap();
//!
//! let mut api = router.group("/api", vec![]);
//! api.get("/health", handler_fn(|_: &mut Request| {})).unwrap();
//!
//! let mut req = Request::new(Method::Get, "/users/42");
//! assert_eq!(router.dispatch(&mut req), Dispatched::Route);
//!
//! let mut req = Request::new(Method::Get, "/api/health");
//! assert_eq!(router.dispatch(&mut req), Dispatched::Route);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod group;
pub mod handler;
pub mod method;
pub mod middleware;
pub mod pool;
pub mod request;
pub mod router;

// Re-exports
pub use error::{Error, Result};
pub use group::{RouteGroup, Routable};
pub use handler::{handler_fn, Handler};
pub use method::Method;
pub use request::{Request, RequestBuilder, RequestContext};
pub use router::{Dispatched, Router, RouterConfig};

// Middleware re-exports
pub use middleware::{compose, from_hooks, middleware_fn, Flow, Hooks, Logging, LoggingConfig, Middleware};
