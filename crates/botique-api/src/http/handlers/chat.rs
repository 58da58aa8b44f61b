//! Chat session handlers.
//!
//! Sessions live only in the in-memory registry: opening one captures the
//! bot snapshot and the access decision, sending runs one turn through the
//! orchestrator, and discarding drops the whole history. A second send while
//! one is in flight is rejected with 409 via `try_lock` -- the engine's own
//! state machine is the second line of defense.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use botique_core::chat::{ChatTurnEngine, SessionContext};
use botique_types::chat::ChatError;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for sending a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("invalid session id".to_string()))
}

/// POST /api/v1/bots/:id/sessions - Open a chat session with a bot.
///
/// Access is evaluated exactly once, here: the bot's creator always has
/// access, anyone else needs an active subscription. The decision is
/// captured in the session context; a denied session can still be opened
/// (the UI shows the conversation view) but every send will be rejected
/// before any generation call.
pub async fn create_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let bot_id = id
        .parse()
        .map_err(|_| AppError::Bot(botique_types::error::BotError::NotFound))?;
    let bot = state.bot_service.get_bot(&bot_id).await?;

    let access_granted = state
        .subscription_service
        .access_granted(&auth.user_id, &bot)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let context = SessionContext {
        user_id: auth.user_id,
        access_granted,
    };

    let engine = ChatTurnEngine::new(
        bot.clone(),
        context,
        state.blob_store.clone(),
        state.generation.clone(),
        state.chat_options(),
    );
    let session_id = state.sessions.create(engine);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({
            "session_id": session_id.to_string(),
            "bot_id": bot.id.to_string(),
            "bot_name": bot.name,
            "access_granted": access_granted,
        }),
        request_id,
        elapsed,
    )
    .with_link("messages", &format!("/api/v1/sessions/{session_id}/messages"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/:id/messages - Run one chat turn.
pub async fn send_message(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_session_id(&id)?;
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound("session not found".to_string()))?;

    // Reject rather than queue a concurrent send for the same session.
    let Ok(mut engine) = session.try_lock() else {
        return Err(AppError::Chat(ChatError::SendInFlight));
    };

    // Sessions are private to the user who opened them.
    if engine.context().user_id != auth.user_id {
        return Err(AppError::NotFound("session not found".to_string()));
    }

    let reply = engine.send(&body.message).await?;
    let turns = engine.turns().to_vec();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"reply": reply, "turns": turns}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// GET /api/v1/sessions/:id/messages - Snapshot of the turn log.
pub async fn get_messages(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_session_id(&id)?;
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound("session not found".to_string()))?;

    let engine = session.lock().await;
    if engine.context().user_id != auth.user_id {
        return Err(AppError::NotFound("session not found".to_string()));
    }
    let turns = engine.turns().to_vec();
    drop(engine);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(serde_json::json!({"turns": turns}), request_id, elapsed);

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/:id - Discard a session and its history.
pub async fn discard_session(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_session_id(&id)?;
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound("session not found".to_string()))?;

    {
        let engine = session.lock().await;
        if engine.context().user_id != auth.user_id {
            return Err(AppError::NotFound("session not found".to_string()));
        }
    }

    state.sessions.discard(&session_id);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"discarded": true}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
