use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Serialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::data::{GenerationInput, GenerationOutput};
use crate::error::InputError;
use crate::solver;

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    search_budget: Option<u64>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        AppState {
            search_budget: config.search_budget,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(InputError),
    Internal(String),
}

impl From<InputError> for ApiError {
    fn from(value: InputError) -> Self {
        ApiError::Invalid(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Invalid(e) => (StatusCode::BAD_REQUEST, "invalid_request", e.to_string()),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(input): Json<GenerationInput>,
) -> Result<Json<GenerationOutput>, ApiError> {
    let budget = state.search_budget;
    // each request builds its own run state on the blocking pool
    let output = tokio::task::spawn_blocking(move || solver::generate_with_budget(&input, budget))
        .await
        .map_err(|e| {
            error!("Generation task failed: {e}");
            ApiError::Internal(e.to_string())
        })??;
    Ok(Json(output))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/timetable/generate", post(generate_handler))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let app = router(AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
