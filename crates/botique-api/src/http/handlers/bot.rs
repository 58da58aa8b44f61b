//! Bot CRUD and upload handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use botique_core::repository::SortOrder;
use botique_core::repository::bot::BotFilter;
use botique_types::bot::{BotId, CreateBotRequest};
use botique_types::identity::UserId;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for GET /api/v1/bots.
#[derive(Debug, Deserialize)]
pub struct BotListQuery {
    /// Restrict to bots created by this user id.
    pub creator: Option<String>,
    #[serde(default = "default_order")]
    pub order: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn default_order() -> String {
    "desc".to_string()
}

/// Query parameters for the upload endpoints.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Original filename; its extension is kept on the stored object key.
    pub filename: String,
}

fn parse_bot_id(raw: &str) -> Result<BotId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Bot(botique_types::error::BotError::NotFound))
}

/// POST /api/v1/bots - Create a new bot.
pub async fn create_bot(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateBotRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = state.bot_service.create_bot(body, auth.user_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let bot_json = serde_json::to_value(&bot)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(bot_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/bots/{}", bot.id))
        .with_link("sessions", &format!("/api/v1/bots/{}/sessions", bot.id));

    Ok(Json(resp))
}

/// GET /api/v1/bots - List bots, optionally one creator's.
pub async fn list_bots(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<BotListQuery>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let creator_id = match &query.creator {
        Some(raw) => Some(
            raw.parse::<UserId>()
                .map_err(|e| AppError::Validation(format!("invalid creator id: {e}")))?,
        ),
        None => None,
    };

    let sort_order = match query.order.to_lowercase().as_str() {
        "asc" => Some(SortOrder::Asc),
        _ => Some(SortOrder::Desc),
    };

    let filter = Some(BotFilter {
        creator_id,
        sort_order,
        limit: query.limit,
        offset: query.offset,
    });

    let bots = state.bot_service.list_bots(filter).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let bots_json = bots
        .iter()
        .map(|b| serde_json::to_value(b).map_err(|e| AppError::Internal(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    let resp = ApiResponse::success(bots_json, request_id, elapsed)
        .with_link("self", "/api/v1/bots");

    Ok(Json(resp))
}

/// GET /api/v1/bots/:id - Get a bot by ID.
pub async fn get_bot(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot = state.bot_service.get_bot(&parse_bot_id(&id)?).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let bot_json = serde_json::to_value(&bot)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(bot_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/bots/{}", bot.id))
        .with_link("sessions", &format!("/api/v1/bots/{}/sessions", bot.id));

    Ok(Json(resp))
}

/// DELETE /api/v1/bots/:id - Delete a bot (creator only).
pub async fn delete_bot(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let bot_id = parse_bot_id(&id)?;
    state.bot_service.delete_bot(&bot_id, &auth.user_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "id": bot_id.to_string()}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// POST /api/v1/bots/:id/picture - Upload a profile picture (creator only).
pub async fn upload_picture(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if body.is_empty() {
        return Err(AppError::Validation("picture body is empty".to_string()));
    }

    let bot = state
        .bot_service
        .upload_picture(&parse_bot_id(&id)?, &auth.user_id, &query.filename, &body)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"profile_pic_url": bot.profile_pic_url}),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/bots/{}", bot.id));

    Ok(Json(resp))
}

/// POST /api/v1/bots/:id/knowledge - Upload a knowledge file (creator only).
///
/// The stored key is appended to the bot's training data; upload order is
/// the prompt concatenation order.
pub async fn upload_knowledge(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if body.is_empty() {
        return Err(AppError::Validation("knowledge body is empty".to_string()));
    }

    let bot = state
        .bot_service
        .upload_knowledge(&parse_bot_id(&id)?, &auth.user_id, &query.filename, &body)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"training_data": bot.training_data}),
        request_id,
        elapsed,
    )
    .with_link("self", &format!("/api/v1/bots/{}", bot.id));

    Ok(Json(resp))
}
