//! JSON HTTP surface over the scoring and attribution models.
//!
//! Handlers are stateless apart from the read-only [`AppState`] built once
//! from configuration.

pub mod error;
mod handlers;

pub use error::ApiError;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::FutureExt;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

use crate::attribution::LiftModel;
use crate::config::Config;
use crate::scoring::{EngineWeights, PercentileBand};

#[derive(Clone)]
pub struct AppState {
    pub(crate) weights: Arc<EngineWeights>,
    pub(crate) lift: LiftModel,
    pub(crate) percentile_bands: Arc<Vec<PercentileBand>>,
    request_timeout: Duration,
    max_body_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let revenue = config.revenue();
        let server = config.server();
        let request_timeout = server.request_timeout().with_context(|| {
            format!(
                "Invalid server.request_timeout '{}'",
                server.request_timeout
            )
        })?;
        Ok(Self {
            weights: Arc::new(config.engine_weights()),
            lift: revenue.lift_model(),
            percentile_bands: Arc::new(revenue.percentile_bands),
            request_timeout,
            max_body_bytes: server.max_body_bytes,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Logs every request and enforces the configured time budget. A handler
/// panic becomes a generic 500.
async fn request_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let handler = AssertUnwindSafe(next.run(req)).catch_unwind();
    let response = match tokio::time::timeout(state.request_timeout, handler).await {
        Ok(Ok(response)) => response,
        Ok(Err(payload)) => {
            let message = panic_message(payload.as_ref()).to_string();
            ApiError::Internal(anyhow::anyhow!("handler panicked: {}", message)).into_response()
        }
        Err(_) => ApiError::Timeout.into_response(),
    };

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/api/formulas/weights", get(handlers::weights_handler))
        .route("/api/win-prob", get(handlers::win_prob_handler))
        .route("/api/scores/:pillar", post(handlers::score_handler))
        .route("/api/composite", post(handlers::composite_handler))
        .route("/api/composite/qai-star", post(handlers::qai_star_handler))
        .route("/api/oel", post(handlers::oel_handler))
        .route("/api/oci", post(handlers::oci_handler))
        .route("/api/rar/compute", post(handlers::rar_handler))
        .route("/api/rar/improvement", post(handlers::improvement_handler))
        .route("/api/forecast", post(handlers::forecast_handler))
        .route("/api/dtri", post(handlers::dtri_handler))
        .layer(from_fn_with_state(state.clone(), request_middleware))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            return;
        }
    }
    let _ = tokio::signal::ctrl_c().await;
}

/// Bind `bind` and serve until SIGINT/SIGTERM, letting in-flight requests
/// finish.
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", bind))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local = listener.local_addr().context("Failed to read local address")?;
    tracing::info!(addr = %local, "dealer-score listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            wait_for_shutdown_signal().await;
            tracing::info!("shutdown signal received, draining");
        })
        .await
        .context("Server failed")?;

    tracing::info!("server stopped");
    Ok(())
}
