//! Request logging middleware
//!
//! Emits one `tracing` event per routed request with the method, path,
//! request id and handler time.

use super::Middleware;
use crate::{Handler, RequestContext};
use std::sync::Arc;
use std::time::Instant;
use tracing::Level;

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    /// Level of the emitted events
    pub level: Level,
    /// Header carrying the request id
    pub request_id_header: String,
    /// Record the time spent inside the wrapped handler
    pub log_elapsed: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            request_id_header: "X-Request-ID".to_string(),
            log_elapsed: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn request_id_header(mut self, name: impl Into<String>) -> Self {
        self.request_id_header = name.into();
        self
    }

    pub fn log_elapsed(mut self, enabled: bool) -> Self {
        self.log_elapsed = enabled;
        self
    }
}

/// Logging middleware
#[derive(Clone, Default)]
pub struct Logging {
    config: Arc<LoggingConfig>,
}

impl Logging {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Turn into a middleware for any request type
    pub fn into_middleware<C>(self) -> Middleware<C>
    where
        C: RequestContext + 'static,
    {
        let config = self.config;
        Arc::new(move |next: Handler<C>| {
            let config = Arc::clone(&config);
            Arc::new(move |ctx: &mut C| {
                let start = Instant::now();
                next(ctx);
                let elapsed_us = config.log_elapsed.then(|| start.elapsed().as_micros() as u64);
                emit(&config, ctx, elapsed_us);
            }) as Handler<C>
        })
    }
}

fn emit<C: RequestContext>(config: &LoggingConfig, ctx: &C, elapsed_us: Option<u64>) {
    let method = ctx.method();
    let path = String::from_utf8_lossy(ctx.path());
    let request_id = ctx.header(&config.request_id_header).unwrap_or("-");

    macro_rules! event_at {
        ($level:ident) => {
            tracing::event!(
                Level::$level,
                method,
                path = %path,
                request_id,
                elapsed_us,
                "request handled"
            )
        };
    }

    // event! needs the level at compile time
    if config.level == Level::TRACE {
        event_at!(TRACE);
    } else if config.level == Level::DEBUG {
        event_at!(DEBUG);
    } else if config.level == Level::INFO {
        event_at!(INFO);
    } else if config.level == Level::WARN {
        event_at!(WARN);
    } else {
        event_at!(ERROR);
    }
}
