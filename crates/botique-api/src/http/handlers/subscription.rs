//! Subscription listing and checkout handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;

use botique_infra::billing::stripe::CheckoutParams;
use botique_types::bot::BotId;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /api/v1/billing/checkout.
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub bot_id: String,
}

/// GET /api/v1/subscriptions - The caller's active subscriptions.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let subs = state
        .subscription_service
        .list_for_user(&auth.user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;
    let subs_json = subs
        .iter()
        .map(|s| serde_json::to_value(s).map_err(|e| AppError::Internal(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    let resp = ApiResponse::success(subs_json, request_id, elapsed)
        .with_link("self", "/api/v1/subscriptions");

    Ok(Json(resp))
}

/// POST /api/v1/billing/checkout - Create a hosted checkout session.
///
/// Pure passthrough to the payment processor; the subscription record is
/// written later by the `checkout.session.completed` webhook, which carries
/// the bot and user ids back in the session metadata.
pub async fn create_checkout(
    State(state): State<AppState>,
    auth: Authenticated,
    headers: HeaderMap,
    Json(body): Json<CreateCheckoutRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let checkout = state.checkout.as_ref().ok_or_else(|| {
        AppError::Internal("billing is not configured on this server".to_string())
    })?;

    let bot_id: BotId = body
        .bot_id
        .parse()
        .map_err(|_| AppError::Bot(botique_types::error::BotError::NotFound))?;
    let bot = state.bot_service.get_bot(&bot_id).await?;

    let origin = headers
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http://localhost:3000")
        .to_string();

    let params = CheckoutParams {
        bot_id: bot.id.clone(),
        bot_name: bot.name.clone(),
        user_id: auth.user_id,
        origin,
        amount_cents: state.config.billing.amount_cents,
        currency: state.config.billing.currency.clone(),
    };

    let session = checkout
        .create_checkout_session(&params)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"url": session.url, "id": session.id}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
