//! Route registration surface and route groups

use crate::{compose, Handler, Method, Middleware, Result};

/// Anything routes can be registered on: a [`Router`](crate::Router) or
/// a [`RouteGroup`]
pub trait Routable<C> {
    /// Register `handler` for `method` and `path`
    ///
    /// # Errors
    /// [`Error::MalformedPath`](crate::Error::MalformedPath) for an empty
    /// non-trailing segment, [`Error::RouteConflict`](crate::Error::RouteConflict)
    /// if a route already ends at the same place.
    fn handle(&mut self, method: Method, path: &str, handler: Handler<C>) -> Result<()>;

    /// Create a registration scope adding `prefix` and wrapping handlers
    /// with `middlewares`
    fn group(&mut self, prefix: &str, middlewares: Vec<Middleware<C>>) -> RouteGroup<'_, C>;

    /// Add a DELETE route
    fn delete(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Delete, path, handler)
    }

    /// Add a GET route
    fn get(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Get, path, handler)
    }

    /// Add a HEAD route
    fn head(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Head, path, handler)
    }

    /// Add an OPTIONS route
    fn options(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Options, path, handler)
    }

    /// Add a PATCH route
    fn patch(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Patch, path, handler)
    }

    /// Add a POST route
    fn post(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Post, path, handler)
    }

    /// Add a PUT route
    fn put(&mut self, path: &str, handler: Handler<C>) -> Result<()> {
        self.handle(Method::Put, path, handler)
    }
}

/// Registration scope with a path prefix and middleware
///
/// A group stores nothing in the trie itself. Each registration goes to
/// the parent as `prefix + path` with the handler already wrapped in this
/// group's middleware, so nested groups wrap innermost-first.
pub struct RouteGroup<'a, C> {
    prefix: String,
    middlewares: Vec<Middleware<C>>,
    parent: &'a mut dyn Routable<C>,
}

impl<'a, C> RouteGroup<'a, C> {
    pub fn new(
        parent: &'a mut dyn Routable<C>,
        prefix: impl Into<String>,
        middlewares: Vec<Middleware<C>>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            middlewares,
            parent,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn middlewares(&self) -> &[Middleware<C>] {
        &self.middlewares
    }
}

impl<C> Routable<C> for RouteGroup<'_, C> {
    fn handle(&mut self, method: Method, path: &str, handler: Handler<C>) -> Result<()> {
        let path = format!("{}{}", self.prefix, path);
        tracing::trace!(
            method = %method,
            path = %path,
            middlewares = self.middlewares.len(),
            "group route"
        );
        self.parent
            .handle(method, &path, compose(handler, &self.middlewares))
    }

    fn group(&mut self, prefix: &str, middlewares: Vec<Middleware<C>>) -> RouteGroup<'_, C> {
        RouteGroup::new(self, prefix, middlewares)
    }
}
