//! Development backend for the chat client.
//!
//! Stands in for the real agent service so the client, the auth context and
//! the terminal UI can be exercised end to end without the upstream stack.
//!
//! Endpoints:
//! - POST /api/agent/chat - Answer a query (plot queries get an artifact)
//! - GET /api/agent/health - Agent health report
//! - GET /api/health - Backend liveness
//! - POST /api/auth/login - Sign in, sets the `session` cookie
//! - POST /api/auth/register - Register and sign in
//! - POST /api/auth/logout - Clear the session
//! - GET /api/auth/me - User bound to the `session` cookie

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::agent::{AgentHealth, AgentQueryRequest, AgentQueryResponse};
use crate::auth::{is_valid_email, AuthResponse, LoginRequest, RegisterRequest};
use crate::models::User;

const SESSION_COOKIE: &str = "session";
const SESSION_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;
const SAMPLE_PLOT_PATH: &str = "contents/plots/sample_histogram.png";
const PLOT_KEYWORDS: &[&str] = &["plot", "histogram", "chart", "heatmap"];

/// Shared server state.
#[derive(Default)]
pub struct ServerState {
    /// Map of session token -> signed-in user.
    sessions: RwLock<HashMap<String, User>>,
}

/// Response from `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

// === Server Lifecycle ===

/// Build the application router.
pub fn router() -> Router {
    let state = Arc::new(ServerState::default());

    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/agent/chat", post(agent_chat))
        .route("/api/agent/health", get(agent_health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already-bound listener until the process exits.
///
/// # Errors
///
/// Returns an error if the underlying server fails.
pub async fn serve(listener: TcpListener) -> Result<()> {
    axum::serve(listener, router()).await.context("Server error")
}

/// Start the server on localhost.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn start_server(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("Alchemist backend listening on http://{addr}");
    info!(%addr, "server started");
    serve(listener).await
}

// === Handlers ===

async fn api_health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn agent_health() -> Json<AgentHealth> {
    Json(AgentHealth {
        success: true,
        message: "Agent system is healthy".to_string(),
    })
}

async fn agent_chat(Json(req): Json<AgentQueryRequest>) -> (StatusCode, Json<AgentQueryResponse>) {
    let query = req.query.trim();
    if query.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(AgentQueryResponse {
                success: false,
                message: "Failed to process query".to_string(),
                error: Some("query must not be empty".to_string()),
                ..AgentQueryResponse::default()
            }),
        );
    }

    info!(query_len = query.len(), "processing agent query");

    let lowered = query.to_lowercase();
    let wants_plot = PLOT_KEYWORDS.iter().any(|k| lowered.contains(k));
    let response = if wants_plot {
        AgentQueryResponse {
            success: true,
            message: format!("Here is a sample plot for: \"{query}\""),
            plot_file_path: Some(SAMPLE_PLOT_PATH.to_string()),
            ..AgentQueryResponse::default()
        }
    } else {
        AgentQueryResponse {
            success: true,
            message: format!("You asked: \"{query}\". The mineral agent is running in stub mode."),
            ..AgentQueryResponse::default()
        }
    };

    (StatusCode::OK, Json(response))
}

async fn login(State(state): State<Arc<ServerState>>, Json(req): Json<LoginRequest>) -> Response {
    if !is_valid_email(req.email.trim()) || req.password.is_empty() {
        return rejected(StatusCode::UNPROCESSABLE_ENTITY, "Invalid email or password");
    }

    let user = User {
        name: "Test User".to_string(),
        email: req.email.trim().to_string(),
    };
    signed_in(&state, user, "Login successful").await
}

async fn register(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if req.name.trim().is_empty() || !is_valid_email(req.email.trim()) || req.password.is_empty() {
        return rejected(StatusCode::UNPROCESSABLE_ENTITY, "Invalid registration details");
    }

    let user = User {
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
    };
    signed_in(&state, user, "Registration successful").await
}

async fn logout(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.write().await.remove(&token);
    }

    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    (
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            message: "Logged out successfully".to_string(),
            user: None,
        }),
    )
        .into_response()
}

async fn me(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let user = match session_token(&headers) {
        Some(token) => state.sessions.read().await.get(&token).cloned(),
        None => None,
    };

    match user {
        Some(user) => Json(user).into_response(),
        None => rejected(StatusCode::UNAUTHORIZED, "Not authenticated"),
    }
}

// === Helpers ===

async fn signed_in(state: &ServerState, user: User, message: &str) -> Response {
    let token = Uuid::now_v7().to_string();
    state.sessions.write().await.insert(token.clone(), user.clone());

    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SESSION_MAX_AGE_SECS}"
    );
    (
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            message: message.to_string(),
            user: Some(user),
        }),
    )
        .into_response()
}

fn rejected(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(AuthResponse {
            success: false,
            message: message.to_string(),
            user: None,
        }),
    )
        .into_response()
}

/// Extract the session token from the `Cookie` header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentError, AgentReply, AgentService, HttpAgentService};
    use crate::auth::{AuthBackend, AuthContext, AuthError, HttpAuthBackend};
    use crate::chat::{ChatSession, SubmitOutcome};
    use axum::http::HeaderValue;

    async fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            serve(listener).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_session_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert!(session_token(&headers).is_none());
        assert!(session_token(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_agent_chat_plain_and_plot() {
        let agent = HttpAgentService::new(spawn_server().await);

        let reply = agent.query("What is pyrite?").await.unwrap();
        assert!(matches!(reply, AgentReply::PlainText(ref t) if t.contains("What is pyrite?")));

        let reply = agent.query("Plot the hardness histogram").await.unwrap();
        assert_eq!(
            reply.artifact().map(|a| a.as_str()),
            Some(SAMPLE_PLOT_PATH)
        );
    }

    #[tokio::test]
    async fn test_agent_chat_rejects_blank_query() {
        let agent = HttpAgentService::new(spawn_server().await);

        let err = agent.query("   ").await.unwrap_err();
        assert!(matches!(err, AgentError::Status { status: 422, .. }));
    }

    #[tokio::test]
    async fn test_agent_health() {
        let agent = HttpAgentService::new(spawn_server().await);

        let health = agent.health().await.unwrap();
        assert!(health.success);
        assert_eq!(health.message, "Agent system is healthy");
    }

    #[tokio::test]
    async fn test_api_health_reports_only_liveness() {
        let base = spawn_server().await;

        let body: serde_json::Value = reqwest::get(format!("{base}/api/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_session_against_server() {
        let session = ChatSession::new(HttpAgentService::new(spawn_server().await));

        let outcome = session.submit("Show me a heatmap of localities").await;

        assert_eq!(outcome, SubmitOutcome::Answered);
        let state = session.snapshot();
        assert_eq!(state.timeline.len(), 3);
        assert!(state.timeline.last().unwrap().artifact.is_some());
        assert_eq!(session.display_title(), "Show me a heatmap of localities");
    }

    #[tokio::test]
    async fn test_auth_cookie_round_trip() {
        let base = spawn_server().await;
        let ctx = AuthContext::new(Arc::new(HttpAuthBackend::new(base).unwrap()));

        assert!(ctx.refresh().await.unwrap().is_none());

        let user = ctx.register("Ana", "ana@example.com", "pw").await.unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(ctx.refresh().await.unwrap(), Some(user));

        ctx.logout().await.unwrap();
        assert!(ctx.refresh().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_rejects_bad_email() {
        let backend = HttpAuthBackend::new(spawn_server().await).unwrap();

        let err = backend.login("nope", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Status { status: 422, .. }));
    }
}
