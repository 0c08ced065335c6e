//! HTTP endpoints for the authorization webhook
//!
//! - `POST /authorize` - Evaluate a SubjectAccessReview
//! - `GET /health` - Health check

use super::types::SubjectAccessReview;
use crate::engine::Authorizer;
use crate::error::AuthzError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    pub fn new(authorizer: Authorizer) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Application error type
#[derive(Debug)]
enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// POST /authorize - Evaluate a SubjectAccessReview
///
/// Resolution failures deny the request and explain why in
/// `status.reason`; they are never reported as allowed.
async fn authorize(
    State(state): State<AppState>,
    Json(mut review): Json<SubjectAccessReview>,
) -> Result<Json<SubjectAccessReview>, AppError> {
    let request = review.to_request().map_err(|e| {
        warn!("Rejecting review: {}", e);
        AppError::BadRequest(e.to_string())
    })?;

    info!(
        "Authorization check: user={}, groups={:?}, verb={}, namespace='{}'",
        request.user,
        request.groups,
        request.action.verb(),
        request.action.namespace()
    );

    match state.authorizer.authorize(&request).await {
        Ok(allowed) => {
            review.status.allowed = allowed;
            review.status.reason.clear();
            info!(
                "Authorization decision for {}: {}",
                request.user,
                if allowed { "ALLOW" } else { "DENY" }
            );
        }
        Err(e) => {
            log_resolution_error(&request.user, &e);
            review.status.allowed = false;
            review.status.reason = e.to_string();
        }
    }

    Ok(Json(review))
}

fn log_resolution_error(user: &str, err: &AuthzError) {
    match err {
        AuthzError::ConfigurationIntegrity(_) => {
            error!("Policy integrity fault while authorizing {}: {}", user, err)
        }
        _ => error!("Failed to authorize {}: {}", user, err),
    }
}

/// GET /health - Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/authorize", post(authorize))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(trace))
        .with_state(state)
}
