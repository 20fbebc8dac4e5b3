use std::sync::Arc;

use crate::llm_client::GenerationBackend;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend. Production wires `AnthropicClient`;
    /// tests substitute a scripted mock.
    pub llm: Arc<dyn GenerationBackend>,
    /// Per-caller request budgets, shared with the background sweep task.
    pub limiter: Arc<RateLimiter>,
}
