use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, ToolConfig};
use crate::error::{PromptDeckError, Result};
use crate::identity::{IdentityResolver, SharedTokenResolver};
use crate::message::InferenceQuery;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityResolver>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            config: Arc::new(config),
            identity,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/{tool}", post(tool_chat))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn tool_chat(
    State(state): State<AppState>,
    Path(tool_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(tool) = state.config.tool(&tool_id) else {
        return plain(StatusCode::NOT_FOUND, "Unknown tool");
    };

    match handle_chat(&state, tool, &headers, &body).await {
        Ok(relayed) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(relayed))
            .unwrap(),
        Err(err) => {
            tracing::error!("[conversation_error] {}: {}", tool.id, err);
            error_response(&err)
        }
    }
}

/// The proxy contract, each step a distinct failure point: identity gate,
/// provider-credential gate, body validation, forward, relay.
async fn handle_chat(
    state: &AppState,
    tool: &ToolConfig,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Bytes> {
    if state.identity.resolve(headers).await.is_none() {
        return Err(PromptDeckError::Auth);
    }

    // Gate retained from the retired primary-provider path; it still runs
    // before any forward is issued.
    if !state.config.provider_key_present() {
        return Err(PromptDeckError::Config(
            "OpenAI key not configured".to_string(),
        ));
    }

    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| PromptDeckError::Serialization(e.to_string()))?;
    let Some(messages) = parsed.get("messages") else {
        return Err(PromptDeckError::Validation(
            "Messages are required".to_string(),
        ));
    };

    let query = messages
        .as_array()
        .and_then(|items| items.last())
        .and_then(|turn| turn.get("content"))
        .and_then(|content| content.as_str())
        .ok_or_else(|| {
            PromptDeckError::Upstream("messages carries no usable last entry".to_string())
        })?;

    forward_query(state, tool, query).await
}

/// Forwards {query} to the tool's backend and relays the JSON reply
/// byte-for-byte. No timeout, no retries; a hang or error here surfaces
/// as the generic 500 branch.
async fn forward_query(state: &AppState, tool: &ToolConfig, query: &str) -> Result<Bytes> {
    tracing::debug!("forwarding query to {} for tool {}", tool.backend_url, tool.id);

    let response = state
        .http
        .post(&tool.backend_url)
        .json(&InferenceQuery {
            query: query.to_string(),
        })
        .send()
        .await
        .map_err(|e| PromptDeckError::Upstream(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PromptDeckError::Upstream(e.to_string()))?;

    // The relay is verbatim, but the payload must at least be JSON.
    serde_json::from_slice::<Value>(&bytes)
        .map_err(|e| PromptDeckError::Upstream(e.to_string()))?;

    Ok(bytes)
}

fn error_response(err: &PromptDeckError) -> Response {
    let (status, body) = match err {
        PromptDeckError::Auth => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        PromptDeckError::Config(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "OpenAI key not configured")
        }
        PromptDeckError::Validation(_) => (StatusCode::BAD_REQUEST, "Messages are required"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    };
    plain(status, body)
}

fn plain(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}

pub async fn run(host: &str, port: u16, config: Config, token: &str) -> Result<()> {
    run_with_shutdown(host, port, config, token, futures::future::pending::<()>()).await
}

pub async fn run_with_shutdown<F>(
    host: &str,
    port: u16,
    config: Config,
    token: &str,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(config, Arc::new(SharedTokenResolver::new(token)));
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PromptDeckError::Runtime(e.to_string()))?;
    tracing::info!("promptdeckd listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PromptDeckError::Runtime(e.to_string()))?;

    Ok(())
}
