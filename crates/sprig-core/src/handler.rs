//! Handler type

use std::sync::Arc;

/// Request handler, shared between the trie and every middleware wrapping it
pub type Handler<C> = Arc<dyn Fn(&mut C) + Send + Sync>;

/// Box a closure as a [`Handler`]
pub fn handler_fn<C, F>(f: F) -> Handler<C>
where
    F: Fn(&mut C) + Send + Sync + 'static,
{
    Arc::new(f)
}
