//! Stripe passthroughs: hosted checkout creation and webhook event decoding.
//!
//! Checkout is one form-encoded POST to `/v1/checkout/sessions`; the nested
//! bracket keys (`line_items[0][price_data][currency]`) are Stripe's form
//! convention. The subscription itself is created later by the
//! `checkout.session.completed` webhook, which carries the bot and user ids
//! back in the session metadata.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use botique_types::bot::BotId;
use botique_types::identity::UserId;

/// Errors from billing HTTP calls.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("billing request failed: {0}")]
    Network(String),

    #[error("billing endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed billing response: {0}")]
    MalformedResponse(String),
}

/// Parameters for a new checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    pub bot_id: BotId,
    pub bot_name: String,
    pub user_id: UserId,
    /// Origin for the success/cancel redirect URLs.
    pub origin: String,
    /// Monthly price in the smallest currency unit.
    pub amount_cents: u64,
    pub currency: String,
}

/// A created checkout session: the caller redirects the user to `url`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Client for the processor's checkout API.
#[derive(Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    secret_key: SecretString,
    base_url: String,
}

impl CheckoutClient {
    /// Create a new checkout client.
    pub fn new(secret_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            secret_key,
            base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Create a monthly-subscription checkout session for a bot.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams,
    ) -> Result<CheckoutSession, BillingError> {
        let form = checkout_form(params);

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BillingError::MalformedResponse(e.to_string()))
    }
}

/// Build the form body for a checkout session request.
fn checkout_form(params: &CheckoutParams) -> Vec<(String, String)> {
    let bot_id = params.bot_id.to_string();
    vec![
        ("payment_method_types[0]".to_string(), "card".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            params.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            format!("Subscription to {}", params.bot_name),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            format!("Monthly subscription to chat with {}", params.bot_name),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            params.amount_cents.to_string(),
        ),
        (
            "line_items[0][price_data][recurring][interval]".to_string(),
            "month".to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("mode".to_string(), "subscription".to_string()),
        (
            "success_url".to_string(),
            format!("{}/bot/{bot_id}?success=true", params.origin),
        ),
        (
            "cancel_url".to_string(),
            format!("{}/bot/{bot_id}?canceled=true", params.origin),
        ),
        ("metadata[botId]".to_string(), bot_id),
        (
            "metadata[userId]".to_string(),
            params.user_id.to_string(),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Webhook event payloads
// ---------------------------------------------------------------------------

/// An incoming webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// The `data` wrapper around the event object.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// The checkout session object inside `checkout.session.completed`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Processor-side subscription id created by the checkout.
    pub subscription: Option<String>,
}

/// The subscription object inside `customer.subscription.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub status: String,
}

impl WebhookEvent {
    /// Decode the event object as a checkout session.
    pub fn checkout_session(&self) -> Result<CheckoutSessionObject, BillingError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| BillingError::MalformedResponse(e.to_string()))
    }

    /// Decode the event object as a subscription.
    pub fn subscription(&self) -> Result<SubscriptionObject, BillingError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| BillingError::MalformedResponse(e.to_string()))
    }
}
