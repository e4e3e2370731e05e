mod config;
mod errors;
mod export;
mod models;
mod routes;
mod search;
mod state;
mod view;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::search::{HttpMatcher, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Talent Assistant dashboard v{}", env!("CARGO_PKG_VERSION"));

    let matcher = HttpMatcher::new(config.search_api_url.clone())?;
    if matcher.is_configured() {
        info!("Matching service endpoint configured");
    } else {
        warn!("SEARCH_API_URL is not set; searches will report a configuration error");
    }

    let state = AppState {
        config: config.clone(),
        matcher: Arc::new(matcher),
        sessions: SessionStore::new(),
    };

    let app = build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
