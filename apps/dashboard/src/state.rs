use std::sync::Arc;

use crate::config::Config;
use crate::search::client::CandidateMatcher;
use crate::search::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable candidate source. Default: `HttpMatcher` against `SEARCH_API_URL`.
    pub matcher: Arc<dyn CandidateMatcher>,
    pub sessions: SessionStore,
}
