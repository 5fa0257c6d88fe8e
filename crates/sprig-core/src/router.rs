//! Method dispatch over per-method route tries
//!
//! Routes are organized by HTTP method for O(1) method dispatch, then
//! matched segment by segment in that method's trie.

use crate::group::{RouteGroup, Routable};
use crate::pool::SegmentPool;
use crate::{Error, Handler, Method, Middleware, RequestContext, Result};
use parking_lot::RwLock;
use smallvec::SmallVec;
use sprig_trie::path::split;
use sprig_trie::{Captures, Node, Span};
use std::collections::HashMap;

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Idle span buffers kept for reuse (0 disables pooling)
    pub pool_capacity: usize,
    /// Treat `/users/` like `/users` at dispatch time
    pub trim_trailing_slash: bool,
    /// Retry unmatched HEAD requests against the GET routes
    pub head_fallback: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 64,
            trim_trailing_slash: false,
            head_fallback: false,
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub fn trim_trailing_slash(mut self, enabled: bool) -> Self {
        self.trim_trailing_slash = enabled;
        self
    }

    pub fn head_fallback(mut self, enabled: bool) -> Self {
        self.head_fallback = enabled;
        self
    }
}

/// How a dispatched request was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A registered route handled it
    Route,
    /// Nothing matched; the not-found handler ran
    NotFound,
    /// Nothing matched and no not-found handler is set
    Unhandled,
}

/// Bound `(name, value)` pairs of a match
type Params<'r> = SmallVec<[(&'r str, String); 8]>;

/// HTTP router
///
/// Registration takes `&mut self`; dispatch only needs `&self`, so a
/// router shared behind an `Arc` can no longer change its routes. The
/// not-found handler is the exception and can be swapped at any time.
pub struct Router<C> {
    /// Method -> trie root
    tries: HashMap<Method, Node<Handler<C>>>,
    not_found: RwLock<Option<Handler<C>>>,
    config: RouterConfig,
    pool: SegmentPool,
}

impl<C: RequestContext> Router<C> {
    /// Create a new router
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router with explicit configuration
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            tries: HashMap::new(),
            not_found: RwLock::new(None),
            pool: SegmentPool::new(config.pool_capacity),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Set or clear the handler for requests nothing matches
    pub fn set_not_found(&self, handler: Option<Handler<C>>) {
        *self.not_found.write() = handler;
    }

    /// Current not-found handler
    pub fn not_found(&self) -> Option<Handler<C>> {
        self.not_found.read().clone()
    }

    /// Check if a method has any routes registered
    pub fn has_method(&self, method: Method) -> bool {
        self.tries.contains_key(&method)
    }

    /// Get all registered methods
    pub fn methods(&self) -> Vec<Method> {
        self.tries.keys().copied().collect()
    }

    /// Route trie of `method`
    pub fn trie(&self, method: Method) -> Option<&Node<Handler<C>>> {
        self.tries.get(&method)
    }

    /// Route a request
    ///
    /// On a match every captured value is stored with
    /// [`RequestContext::set_param`] before the handler runs exactly once.
    /// Otherwise the not-found handler runs, if any.
    pub fn dispatch(&self, ctx: &mut C) -> Dispatched {
        let Some(method) = Method::parse(ctx.method().as_bytes()) else {
            tracing::trace!(method = ctx.method(), "unknown method");
            return self.fallback(ctx);
        };

        let mut found = self.find(method, ctx);
        if found.is_none() && self.config.head_fallback && method == Method::Head {
            found = self.find(Method::Get, ctx);
        }

        let Some((handler, params)) = found else {
            tracing::trace!(
                method = %method,
                path = %String::from_utf8_lossy(ctx.path()),
                "no route matched"
            );
            return self.fallback(ctx);
        };

        for (name, value) in &params {
            ctx.set_param(name, value);
        }
        handler(ctx);
        Dispatched::Route
    }

    fn find(&self, method: Method, ctx: &C) -> Option<(&Handler<C>, Params<'_>)> {
        let trie = self.tries.get(&method)?;
        let Ok(path) = std::str::from_utf8(ctx.path()) else {
            tracing::trace!("path is not valid UTF-8");
            return None;
        };

        let mut segments = self.pool.acquire();
        split(path, &mut segments);
        if self.config.trim_trailing_slash
            && segments.len() > 1
            && segments.last().is_some_and(Span::is_empty)
        {
            segments.pop();
        }

        let mut values = Captures::new();
        let node = trie.lookup(path, &segments, &mut values)?;
        let handler = node.handler()?;
        let params = node
            .param_names()
            .iter()
            .zip(&values)
            .map(|(name, span)| (name.as_str(), span.slice(path).to_owned()))
            .collect();

        Some((handler, params))
    }

    fn fallback(&self, ctx: &mut C) -> Dispatched {
        // Clone out so the handler may replace itself
        let handler = self.not_found.read().clone();
        match handler {
            Some(handler) => {
                handler(ctx);
                Dispatched::NotFound
            }
            None => Dispatched::Unhandled,
        }
    }
}

impl<C: RequestContext> Routable<C> for Router<C> {
    fn handle(&mut self, method: Method, path: &str, handler: Handler<C>) -> Result<()> {
        self.tries
            .entry(method)
            .or_default()
            .insert(path, handler)
            .map_err(|err| Error::from_insert(method, err))?;

        tracing::debug!(method = %method, path, "route registered");
        Ok(())
    }

    fn group(&mut self, prefix: &str, middlewares: Vec<Middleware<C>>) -> RouteGroup<'_, C> {
        RouteGroup::new(self, prefix, middlewares)
    }
}

impl<C: RequestContext> Default for Router<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handler_fn, Request};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, Handler<Request>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let handler = {
            let hits = Arc::clone(&hits);
            handler_fn(move |_: &mut Request| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        (hits, handler)
    }

    fn noop() -> Handler<Request> {
        handler_fn(|_: &mut Request| {})
    }

    #[test]
    fn test_static_routes_per_method() {
        let mut router: Router<Request> = Router::new();
        let (get_hits, get) = counter();
        let (post_hits, post) = counter();
        router.get("/users", get).unwrap();
        router.post("/users", post).unwrap();

        let mut req = Request::new(Method::Get, "/users");
        assert_eq!(router.dispatch(&mut req), Dispatched::Route);
        assert!(req.params.is_empty());

        let mut req = Request::new(Method::Post, "/users");
        assert_eq!(router.dispatch(&mut req), Dispatched::Route);

        assert_eq!(get_hits.load(Ordering::SeqCst), 1);
        assert_eq!(post_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_verb_registers() {
        let mut router: Router<Request> = Router::new();
        router.delete("/r", noop()).unwrap();
        router.get("/r", noop()).unwrap();
        router.head("/r", noop()).unwrap();
        router.options("/r", noop()).unwrap();
        router.patch("/r", noop()).unwrap();
        router.post("/r", noop()).unwrap();
        router.put("/r", noop()).unwrap();

        for method in [
            Method::Delete,
            Method::Get,
            Method::Head,
            Method::Options,
            Method::Patch,
            Method::Post,
            Method::Put,
        ] {
            assert!(router.has_method(method), "{method}");
            let mut req = Request::new(method, "/r");
            assert_eq!(router.dispatch(&mut req), Dispatched::Route);
        }
        assert!(!router.has_method(Method::Trace));
        assert_eq!(router.methods().len(), 7);
    }

    #[test]
    fn test_params_bound_before_handler() {
        let mut router: Router<Request> = Router::new();
        router
            .get(
                "/:a/:b/:c",
                handler_fn(|req: &mut Request| {
                    assert_eq!(req.param("a"), Some("1"));
                    assert_eq!(req.param("b"), Some("2"));
                    assert_eq!(req.param("c"), Some("3"));
                }),
            )
            .unwrap();

        let mut req = Request::new(Method::Get, "/1/2/3");
        assert_eq!(router.dispatch(&mut req), Dispatched::Route);
        assert_eq!(req.params.len(), 3);
    }

    #[test]
    fn test_root_route() {
        let mut router: Router<Request> = Router::new();
        let (hits, handler) = counter();
        router.get("/", handler).unwrap();

        router.dispatch(&mut Request::new(Method::Get, "/"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_root_without_handler_is_not_found() {
        let mut router: Router<Request> = Router::new();
        router.get("/users", noop()).unwrap();
        let (missing, not_found) = counter();
        router.set_not_found(Some(not_found));

        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/")),
            Dispatched::NotFound
        );
        assert_eq!(missing.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registration_errors() {
        let mut router: Router<Request> = Router::new();
        router.get("/users", noop()).unwrap();

        assert_eq!(
            router.get("/users", noop()),
            Err(Error::RouteConflict {
                method: Method::Get,
                path: "/users".to_string()
            })
        );
        assert_eq!(
            router.get("/users//posts", noop()),
            Err(Error::MalformedPath {
                method: Method::Get,
                path: "/users//posts".to_string()
            })
        );
        // Same pattern, different method
        router.post("/users", noop()).unwrap();
    }

    #[test]
    fn test_unhandled_without_not_found() {
        let mut router: Router<Request> = Router::new();
        let (hits, handler) = counter();
        router.get("/users", handler).unwrap();

        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/nope")),
            Dispatched::Unhandled
        );
        assert_eq!(
            router.dispatch(&mut Request::new(Method::Put, "/users")),
            Dispatched::Unhandled
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_not_found_can_be_cleared() {
        let router: Router<Request> = Router::new();
        router.set_not_found(Some(noop()));
        assert!(router.not_found().is_some());
        router.set_not_found(None);
        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/")),
            Dispatched::Unhandled
        );
    }

    #[test]
    fn test_not_found_may_replace_itself() {
        let router: Arc<Router<Request>> = Arc::new(Router::new());
        let (hits, second) = counter();
        let first = {
            let router = Arc::downgrade(&router);
            let second = second.clone();
            handler_fn(move |_: &mut Request| {
                if let Some(router) = router.upgrade() {
                    router.set_not_found(Some(second.clone()));
                }
            })
        };
        router.set_not_found(Some(first));

        router.dispatch(&mut Request::new(Method::Get, "/a"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        router.dispatch(&mut Request::new(Method::Get, "/a"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trailing_slash_strict_by_default() {
        let mut router: Router<Request> = Router::new();
        router.get("/users/", noop()).unwrap();

        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/users")),
            Dispatched::Route
        );
        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/users/")),
            Dispatched::Unhandled
        );
    }

    #[test]
    fn test_trim_trailing_slash() {
        let mut router: Router<Request> =
            Router::with_config(RouterConfig::new().trim_trailing_slash(true));
        router.get("/users", noop()).unwrap();

        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/users/")),
            Dispatched::Route
        );
        assert_eq!(
            router.dispatch(&mut Request::new(Method::Get, "/users//")),
            Dispatched::Unhandled
        );
    }

    #[test]
    fn test_head_fallback() {
        let mut router: Router<Request> =
            Router::with_config(RouterConfig::new().head_fallback(true));
        let (hits, handler) = counter();
        router.get("/resource/:id", handler).unwrap();

        let mut req = Request::new(Method::Head, "/resource/9");
        assert_eq!(router.dispatch(&mut req), Dispatched::Route);
        assert_eq!(req.param("id"), Some("9"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let strict: Router<Request> = {
            let mut router: Router<Request> = Router::new();
            router.get("/resource", noop()).unwrap();
            router
        };
        assert_eq!(
            strict.dispatch(&mut Request::new(Method::Head, "/resource")),
            Dispatched::Unhandled
        );
    }

    #[test]
    fn test_dispatch_returns_buffer_to_pool() {
        let mut router: Router<Request> = Router::with_config(RouterConfig::new().pool_capacity(1));
        router.get("/a/:b", noop()).unwrap();

        router.dispatch(&mut Request::new(Method::Get, "/a/b"));
        router.dispatch(&mut Request::new(Method::Get, "/missing"));
        assert_eq!(router.pool.idle(), 1);
    }

    struct RawRequest {
        method: &'static str,
        path: Vec<u8>,
        params: Vec<(String, String)>,
    }

    impl RequestContext for RawRequest {
        fn method(&self) -> &str {
            self.method
        }

        fn path(&self) -> &[u8] {
            &self.path
        }

        fn set_param(&mut self, name: &str, value: &str) {
            self.params.push((name.to_string(), value.to_string()));
        }
    }

    #[test]
    fn test_custom_request_context() {
        let mut router: Router<RawRequest> = Router::new();
        router
            .get("/files/:name", handler_fn(|_: &mut RawRequest| {}))
            .unwrap();

        let mut req = RawRequest {
            method: "GET",
            path: b"/files/a.txt".to_vec(),
            params: Vec::new(),
        };
        assert_eq!(router.dispatch(&mut req), Dispatched::Route);
        assert_eq!(req.params, vec![("name".to_string(), "a.txt".to_string())]);

        let mut lower = RawRequest {
            method: "get",
            path: b"/files/a.txt".to_vec(),
            params: Vec::new(),
        };
        assert_eq!(router.dispatch(&mut lower), Dispatched::Unhandled);

        let mut invalid = RawRequest {
            method: "GET",
            path: b"/files/\xff".to_vec(),
            params: Vec::new(),
        };
        assert_eq!(router.dispatch(&mut invalid), Dispatched::Unhandled);
        assert!(invalid.params.is_empty());
    }
}
