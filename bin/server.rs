// CNPJ Lookup - Web Server
// Same search pipeline as the TUI, served as one HTML page plus a JSON endpoint

use anyhow::{Context as _, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use cnpj_lookup::{
    telemetry, BrasilApiClient, Cnpj, Config, LookupError, RecordView, SearchOutcome,
    SearchSession, SearchState,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    fn err(error: &LookupError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            code: Some(error.code()),
        }
    }
}

/// Lookup response
#[derive(Serialize)]
struct LookupResponse {
    cnpj: String,
    fetched_at: DateTime<Utc>,
    view: RecordView,
}

impl From<SearchOutcome> for LookupResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            cnpj: outcome.cnpj.to_string(),
            fetched_at: outcome.fetched_at,
            view: outcome.view,
        }
    }
}

fn status_for(error: &LookupError) -> StatusCode {
    if error.is_input_error() {
        return StatusCode::BAD_REQUEST;
    }
    match error {
        LookupError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: &LookupError) -> axum::response::Response {
    (status_for(error), Json(ApiResponse::<LookupResponse>::err(error))).into_response()
}

/// Blocking search on a worker thread, with its own client
fn run_search(config: &Config, cnpj: &Cnpj) -> Result<SearchOutcome, LookupError> {
    let client = BrasilApiClient::new(config)?;
    let mut session = SearchSession::new(client);

    match session.submit(cnpj.digits()) {
        SearchState::Presenting(outcome) => Ok(outcome.clone()),
        SearchState::Failed(err) => Err(err.clone()),
        other => Err(LookupError::Transport(format!("search stopped in state {}", other.name()))),
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/cnpj/:id - Look up one company
async fn lookup_cnpj(State(state): State<AppState>, Path(raw): Path<String>) -> impl IntoResponse {
    // Reject bad input before touching a worker thread
    let cnpj = match Cnpj::parse(&raw) {
        Ok(cnpj) => cnpj,
        Err(err) => {
            tracing::info!(input = %raw, code = err.code(), "rejected lookup input");
            return error_response(&err);
        }
    };

    let config = state.config.clone();
    let joined = tokio::task::spawn_blocking(move || run_search(&config, &cnpj)).await;

    match joined {
        Ok(Ok(outcome)) => {
            (StatusCode::OK, Json(ApiResponse::ok(LookupResponse::from(outcome)))).into_response()
        }
        Ok(Err(err)) => error_response(&err),
        Err(e) => {
            tracing::error!(error = %e, "lookup worker panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<LookupResponse> {
                    success: false,
                    data: None,
                    error: Some("Internal error".to_string()),
                    code: Some("INTERNAL"),
                }),
            )
                .into_response()
        }
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/cnpj/:id", get(lookup_cnpj))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_stderr();

    println!("🌐 CNPJ Lookup - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env()?;
    println!("✓ Registry: {}", config.api_base_url);

    let addr = config.server_addr;
    let app = build_router(AppState {
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/cnpj/{{cnpj}}", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");

    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router() -> Router {
        // Nothing listens on the discard port, so a lookup that gets past
        // validation fails fast with a transport error.
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..Config::default()
        };
        build_router(AppState {
            config: Arc::new(config),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_lookup_short_cnpj_is_bad_request() {
        let (status, body) = get_json("/api/cnpj/11.222%2F0001").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": "Invalid CNPJ. Ensure the CNPJ has 14 digits.",
                "code": "INVALID_LENGTH"
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_whitespace_is_invalid_length() {
        let (status, body) = get_json("/api/cnpj/%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_LENGTH");
    }

    #[tokio::test]
    async fn test_lookup_punctuated_cnpj_reaches_registry() {
        // Encoded slash is decoded by the Path extractor and passes validation
        let (status, body) = get_json("/api/cnpj/11.222.333%2F0001-81").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "TRANSPORT_ERROR");
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&LookupError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&LookupError::InvalidLength { len: 3 }), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&LookupError::NotFound { status: 500 }), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&LookupError::Transport("timeout".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&LookupError::Decode("eof".into())), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_body() {
        let body = serde_json::to_value(ApiResponse::<LookupResponse>::err(&LookupError::NotFound { status: 404 })).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "CNPJ not found in the database.");
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_ok_body() {
        let body = serde_json::to_value(ApiResponse::ok("OK")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
        assert!(body.get("error").is_none());
    }
}
