use std::sync::Arc;

use crate::bot::{handlers::Deps, ChatTransport, RateLimiter};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<Deps>,
    pub transport: Arc<dyn ChatTransport>,
    pub limiter: Arc<RateLimiter>,
    pub webhook_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        deps: Deps,
        transport: Arc<dyn ChatTransport>,
        limiter: RateLimiter,
        webhook_secret: &str,
    ) -> Self {
        Self {
            deps: Arc::new(deps),
            transport,
            limiter: Arc::new(limiter),
            webhook_secret: Arc::from(webhook_secret),
        }
    }
}
