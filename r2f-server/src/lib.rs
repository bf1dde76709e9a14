//! HTTP API and runtime bindings for the reconciliation server.

pub mod dump;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use r2f_engine::{CallContext, ReconcileError, Reconciler};
use r2f_model::Feature;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub use dump::{DumpError, DumpRuntime};

/// Shared state behind every route.
pub struct ApiState {
    reconciler: Arc<Reconciler>,
    call_timeout: Option<Duration>,
    shutdown: CancellationToken,
}

impl ApiState {
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self {
            reconciler,
            call_timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Deadline applied to each reconciliation request.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// In-flight requests are cancelled when `token` is.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    fn call_context(&self) -> CallContext {
        let ctx = match self.call_timeout {
            Some(timeout) => CallContext::with_timeout(timeout),
            None => CallContext::new(),
        };
        ctx.cancelled_by(self.shutdown.child_token())
    }
}

/// Error body returned by every route.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

struct ApiError(ReconcileError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_interrupted() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!("Request failed ({}): {}", self.0.kind(), self.0);
        let body = ErrorResponse {
            error: error_chain(&self.0),
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Renders an error and its sources as `outer: inner: ...`, skipping
/// sources already included in the outer message.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

type ApiResult = Result<Json<Feature>, ApiError>;

async fn launch_handler(State(state): State<Arc<ApiState>>) -> Json<Feature> {
    Json(state.reconciler.baseline().as_ref().clone())
}

async fn running_handler(State(state): State<Arc<ApiState>>) -> ApiResult {
    let ctx = state.call_context();
    state
        .reconciler
        .running_feature(&ctx)
        .await
        .map(Json)
        .map_err(ApiError)
}

async fn upgrade_handler(State(state): State<Arc<ApiState>>) -> ApiResult {
    let ctx = state.call_context();
    state.reconciler.drift(&ctx).await.map(Json).map_err(ApiError)
}

async fn runtime_handler(State(state): State<Arc<ApiState>>) -> ApiResult {
    let ctx = state.call_context();
    state
        .reconciler
        .reconciled_feature(&ctx)
        .await
        .map(|feature| Json(feature.as_ref().clone()))
        .map_err(ApiError)
}

/// Build the HTTP API router over the given state.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/v1/features/launch", get(launch_handler))
        .route("/api/v1/features/running", get(running_handler))
        .route("/api/v1/features/upgrade", get(upgrade_handler))
        .route("/api/v1/features/runtime", get(runtime_handler))
        .with_state(state)
}
