//! Middleware
//!
//! A middleware turns a handler into a wrapping handler. Wrapping happens
//! once, at registration time; the trie stores the fully composed handler.

pub mod logging;

pub use logging::{Logging, LoggingConfig};

use crate::Handler;
use std::sync::Arc;

/// Handler-to-handler transformation
pub type Middleware<C> = Arc<dyn Fn(Handler<C>) -> Handler<C> + Send + Sync>;

/// Box a closure as a [`Middleware`]
pub fn middleware_fn<C, F>(f: F) -> Middleware<C>
where
    F: Fn(Handler<C>) -> Handler<C> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap `handler` with `middlewares`
///
/// `middlewares[0]` is applied first and ends up innermost; the last
/// entry is the outermost layer and runs first when a request arrives.
/// Given `[m1, m2]` the execution order is `m2`, `m1`, handler.
pub fn compose<C>(handler: Handler<C>, middlewares: &[Middleware<C>]) -> Handler<C> {
    middlewares.iter().fold(handler, |inner, middleware| middleware(inner))
}

/// Whether a `before` hook lets the request through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Before/after hooks around a handler
pub trait Hooks<C>: Send + Sync {
    /// Process request before handler; [`Flow::Halt`] skips the handler
    /// and the `after` hook
    fn before(&self, _ctx: &mut C) -> Flow {
        Flow::Continue
    }

    /// Process request after handler
    fn after(&self, _ctx: &mut C) {}
}

/// Adapt a [`Hooks`] implementation into a [`Middleware`]
pub fn from_hooks<C, T>(hooks: T) -> Middleware<C>
where
    C: 'static,
    T: Hooks<C> + 'static,
{
    let hooks = Arc::new(hooks);
    Arc::new(move |next: Handler<C>| {
        let hooks = Arc::clone(&hooks);
        Arc::new(move |ctx: &mut C| {
            if hooks.before(ctx) == Flow::Halt {
                return;
            }
            next(ctx);
            hooks.after(ctx);
        }) as Handler<C>
    })
}
