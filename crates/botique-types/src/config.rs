//! Global configuration types for Botique.
//!
//! Deserialized from `{data_dir}/config.toml`. Every field has a default so
//! a missing or partial file still yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub billing: BillingSettings,
}

/// Settings for the external text-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier at the generation endpoint.
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Override the endpoint base URL (proxies, testing).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_generation_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_generation_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Settings for the chat turn pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    /// When true, a failed generation marks the optimistic user turn as
    /// failed instead of leaving it unmarked.
    #[serde(default)]
    pub mark_failed_turns: bool,
    /// Optional character cap applied to the rendered history section of the
    /// prompt. Unset means no cap: prompt growth is unbounded.
    #[serde(default)]
    pub history_char_limit: Option<usize>,
}

/// Settings for the payment processor integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Environment variable holding the processor's secret API key.
    #[serde(default = "default_billing_key_env")]
    pub secret_key_env: String,
    /// Environment variable holding the webhook signing secret.
    #[serde(default = "default_webhook_secret_env")]
    pub webhook_secret_env: String,
    /// Monthly subscription price in the smallest currency unit.
    #[serde(default = "default_amount_cents")]
    pub amount_cents: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            secret_key_env: default_billing_key_env(),
            webhook_secret_env: default_webhook_secret_env(),
            amount_cents: default_amount_cents(),
            currency: default_currency(),
        }
    }
}

fn default_billing_key_env() -> String {
    "STRIPE_SECRET_KEY".to_string()
}

fn default_webhook_secret_env() -> String {
    "STRIPE_WEBHOOK_SECRET".to_string()
}

fn default_amount_cents() -> u64 {
    500
}

fn default_currency() -> String {
    "usd".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: GlobalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.generation.api_key_env, "GEMINI_API_KEY");
        assert!(config.generation.base_url.is_none());
        assert!(!config.chat.mark_failed_turns);
        assert!(config.chat.history_char_limit.is_none());
        assert_eq!(config.billing.amount_cents, 500);
        assert_eq!(config.billing.currency, "usd");
    }

    #[test]
    fn test_partial_section_fills_remaining_fields() {
        let json = r#"{"chat":{"mark_failed_turns":true},"billing":{"amount_cents":900}}"#;
        let config: GlobalConfig = serde_json::from_str(json).unwrap();
        assert!(config.chat.mark_failed_turns);
        assert!(config.chat.history_char_limit.is_none());
        assert_eq!(config.billing.amount_cents, 900);
        assert_eq!(config.billing.currency, "usd");
    }
}
