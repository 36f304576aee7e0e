// SPDX-License-Identifier: MIT

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::adk::error::{ConductorError, Result};
use crate::conductor::config::AppConfig;
use crate::conductor::orchestrator::{AgentRequest, Orchestrator};

/// Successful dispatch
#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub output: String,
}

/// Failed dispatch; `detail` carries the error message
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl From<ConductorError> for ErrorResponse {
    fn from(e: ConductorError) -> Self {
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            detail: e.to_string(),
            status,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub fn router(orchestrator: Arc<Orchestrator>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/execute_agent", post(execute_agent))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(orchestrator)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let orchestrator = Arc::new(Orchestrator::from_config(&config).await?);
    tokio::fs::create_dir_all(&config.static_dir).await?;
    let app = router(orchestrator.clone(), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    orchestrator.shutdown().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn execute_agent(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(request): Json<AgentRequest>,
) -> std::result::Result<Json<ExecuteResponse>, ErrorResponse> {
    match orchestrator.execute(&request).await {
        Ok(output) => Ok(Json(ExecuteResponse { output })),
        Err(e) => {
            log::error!("Agent '{}' failed: {}", request.agent, e);
            Err(e.into())
        }
    }
}
