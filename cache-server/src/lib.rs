//! Thin HTTP adapter over [`cache_engine`]'s in-process cache engine.
//!
//! Everything in this crate is a trivial mapping from wire requests to
//! engine calls, plus the ambient concerns (validation, rate limiting,
//! CORS, compression, structured logging, graceful shutdown) a production
//! service in this corpus carries. No eviction, TTL, or statistics logic
//! lives here — see `cache_engine` for the core.

pub mod config;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use cache_engine::sweeper::Sweeper;

pub use config::ServerConfig;
pub use state::AppState;

/// Builds the fully layered application router: routing, rate limiting,
/// CORS, compression, and request tracing, in that order from the
/// innermost handler outward.
pub fn build_app(state: AppState) -> Router {
    let limiter = rate_limit::RateLimiter::new(state.config.rate_limit_per_minute);
    let cors = build_cors_layer(&state.config.cors_origin_list());

    let mut router = routes::app(state.clone())
        .layer(from_fn_with_state(
            limiter,
            rate_limit::rate_limit_middleware,
        ))
        .layer(cors)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::redact_server_errors,
        ))
        .layer(TraceLayer::new_for_http());

    if state.config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }
    router
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(tower_http::cors::Any);
    }
    let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    base.allow_origin(AllowOrigin::list(parsed))
}

/// Runs the server until a shutdown signal arrives, then drains in-flight
/// requests, stops the sweeper, and clears the engine.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.log_summary();
    let state = AppState::new(config);
    let cleanup_interval = Duration::from_millis(state.config.cleanup_interval_ms);

    let mut sweeper = Sweeper::new(state.cache.clone());
    sweeper.start(cleanup_interval);

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = build_app(state.clone());

    tracing::info!(%addr, "cache-server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.stop().await;
    state.cache.clear();
    tracing::info!("cache-server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining in-flight requests");
}
