use anyhow::Result;
use axum::{
    extract::{Json, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum::extract::rejection::JsonRejection;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::service::{AlertError, AlertService};
use crate::TARGET_WEB_REQUEST;

const SERVICE_NAME: &str = "Tocsin Emergency Alert API";

impl IntoResponse for AlertError {
    fn into_response(self) -> Response {
        match self {
            AlertError::InvalidFormat(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid ZIP code format",
                    "message": "ZIP code must be exactly 5 digits",
                })),
            )
                .into_response(),
            AlertError::UnknownLocation { available, .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "ZIP code not found",
                    "message": "This ZIP code is not in the location directory",
                    "availableZipCodes": available,
                })),
            )
                .into_response(),
        }
    }
}

/// Builds the API router around a shared alert service.
pub fn router(service: AlertService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/generate-alert", post(generate_alert))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Runs the API server until the process is interrupted.
pub async fn app_api_loop(service: AlertService, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(target: TARGET_WEB_REQUEST, "Server running on http://{}", addr);
    info!(target: TARGET_WEB_REQUEST, "  GET  http://{}/api/health", addr);
    info!(target: TARGET_WEB_REQUEST, "  POST http://{}/api/generate-alert", addr);

    axum::serve(listener, router(service).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: TARGET_WEB_REQUEST, "Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        error!("Failed to listen for ctrl-c");
    }
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "generateAlert": "POST /api/generate-alert",
        },
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
    }))
}

/// Reads `zipCode` from a request body, accepting a JSON string or number.
fn zip_code_from(body: &Value) -> String {
    match body.get("zipCode") {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Number(code)) => code.to_string(),
        _ => String::new(),
    }
}

/// Generates a personalized alert for the ZIP code in the request body.
///
/// Bodies that are not JSON objects are treated as a missing ZIP code.
async fn generate_alert(
    State(service): State<AlertService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let zip_code = match payload {
        Ok(Json(body)) => zip_code_from(&body),
        Err(rejection) => {
            debug!(target: TARGET_WEB_REQUEST, "Unreadable request body: {}", rejection.body_text());
            String::new()
        }
    };
    match service.build_alert(&zip_code).await {
        Ok(response) => {
            info!(target: TARGET_WEB_REQUEST, "Generated alert for ZIP {}", zip_code);
            Json(response).into_response()
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Rejected alert request: {}", e);
            e.into_response()
        }
    }
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": format!("Route {} does not exist", uri.path()),
        })),
    )
}
