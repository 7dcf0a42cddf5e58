//! HTTP request handlers

use super::assets::{index_html, serve_static};
use super::history::{self, Exchange};
use super::types::{ChatRequest, ChatResponse, ErrorResponse, PersonaResponse};
use super::AppState;
use crate::dispatch::DispatchError;
use crate::session::Session;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Reply shown when the model keeps calling tools past the round cap
const DEGRADED_REPLY: &str =
    "Sorry, I got a bit tangled up answering that. Could you rephrase or ask me something else?";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat widget
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        // Chat API
        .route("/api/persona", get(get_persona))
        .route("/api/chat", post(chat))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

async fn serve_index() -> Response {
    match index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - chat widget not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn get_persona(State(state): State<AppState>) -> Json<PersonaResponse> {
    let greeting = state.persona.greeting();
    Json(PersonaResponse {
        name: state.persona.name.clone(),
        history: vec![Exchange::greeting(greeting.clone())],
        greeting,
    })
}

/// Run one turn and return the updated widget history
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    let transcript = history::to_transcript(&req.history);
    let mut session = Session::start(&*state.system_prompt, transcript, req.message.as_str());

    let reply = match state.dispatcher.run_turn(&mut session).await {
        Ok(text) => text,
        Err(DispatchError::ToolLoopExceeded { rounds }) => {
            tracing::warn!(rounds, "Replying with degraded answer");
            DEGRADED_REPLY.to_string()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ChatResponse {
        history: history::from_turn(req.history, req.message, reply),
    }))
}

async fn get_version() -> &'static str {
    concat!("folio-agent ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Upstream(String),
    Timeout(String),
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        tracing::error!(error = %e, "Turn failed");
        match e {
            DispatchError::Backend(_) => {
                AppError::Upstream("The assistant is unavailable right now".to_string())
            }
            DispatchError::TurnTimeout(_) => {
                AppError::Timeout("The assistant took too long to answer".to_string())
            }
            DispatchError::ToolLoopExceeded { .. } => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
