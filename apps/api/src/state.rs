use std::sync::Arc;

use crate::config::Config;
use crate::screening::skill_matcher::SemanticMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable semantic matcher. Default: `LlmSemanticMatcher`, which reports itself
    /// unavailable when no API key is configured.
    pub semantic_matcher: Arc<dyn SemanticMatcher>,
}
