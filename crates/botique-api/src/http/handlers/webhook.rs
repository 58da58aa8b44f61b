//! Billing webhook handler.
//!
//! POST /api/v1/webhooks/billing
//!
//! The processor signs each delivery; verification of that signature is the
//! endpoint's authentication (no API key). Handled events drive the
//! subscription write path:
//! - `checkout.session.completed` creates an active subscription from the
//!   session metadata
//! - `customer.subscription.updated` / `customer.subscription.deleted` flip
//!   the active flag by processor subscription id
//!
//! Unknown event types are acknowledged and ignored.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use secrecy::ExposeSecret;

use botique_infra::billing::stripe::WebhookEvent;
use botique_infra::billing::verify_webhook_signature;
use botique_types::bot::BotId;
use botique_types::identity::UserId;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/webhooks/billing - Receive a processor event.
pub async fn billing_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let secret = state.webhook_secret.as_ref().ok_or_else(|| {
        AppError::Internal("billing webhook secret is not configured".to_string())
    })?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("missing signature header".to_string()))?;

    verify_webhook_signature(secret.expose_secret().as_bytes(), &body, signature)
        .map_err(|_| AppError::Unauthorized("invalid webhook signature".to_string()))?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("malformed event payload: {e}")))?;

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session = event
                .checkout_session()
                .map_err(|e| AppError::Validation(e.to_string()))?;

            let bot_id = session.metadata.get("botId").and_then(|v| v.parse::<BotId>().ok());
            let user_id = session.metadata.get("userId").and_then(|v| v.parse::<UserId>().ok());

            if let (Some(bot_id), Some(user_id)) = (bot_id, user_id) {
                state
                    .subscription_service
                    .activate_from_checkout(user_id, bot_id, session.subscription)
                    .await
                    .map_err(|e| AppError::Internal(e.to_string()))?;
            } else {
                tracing::warn!(
                    event_type = %event.event_type,
                    "checkout completed without bot/user metadata; ignored"
                );
            }
        }

        "customer.subscription.updated" | "customer.subscription.deleted" => {
            let subscription = event
                .subscription()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            let is_active = subscription.status == "active";

            state
                .subscription_service
                .set_status_by_processor_id(&subscription.id, is_active)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }

        other => {
            tracing::debug!(event_type = %other, "unhandled billing event type");
        }
    }

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"received": true}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
