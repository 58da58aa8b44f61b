//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. Services are generic over repository/blob-store traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use botique_core::chat::{ChatOptions, ChatTurnEngine};
use botique_core::service::bot::BotService;
use botique_core::service::subscription::SubscriptionService;
use botique_infra::billing::CheckoutClient;
use botique_infra::config::{load_global_config, resolve_data_dir};
use botique_infra::generation::GeminiClient;
use botique_infra::secret::EnvSecretProvider;
use botique_infra::sqlite::bot::SqliteBotRepository;
use botique_infra::sqlite::pool::DatabasePool;
use botique_infra::sqlite::subscription::SqliteSubscriptionRepository;
use botique_infra::storage::LocalBlobStore;
use botique_types::config::GlobalConfig;

use crate::sessions::SessionRegistry;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteBotService = BotService<SqliteBotRepository, LocalBlobStore>;

pub type ConcreteSubscriptionService = SubscriptionService<SqliteSubscriptionRepository>;

pub type ConcreteChatEngine = ChatTurnEngine<LocalBlobStore, GeminiClient>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub bot_service: Arc<ConcreteBotService>,
    pub subscription_service: Arc<ConcreteSubscriptionService>,
    /// Live in-memory chat sessions. Deliberately not persisted: a process
    /// restart discards every session's history.
    pub sessions: Arc<SessionRegistry>,
    pub blob_store: LocalBlobStore,
    pub generation: GeminiClient,
    /// Checkout client, present only when the billing key is configured.
    pub checkout: Option<CheckoutClient>,
    /// Webhook signing secret, present only when configured.
    pub webhook_secret: Option<SecretString>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("botique.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let blob_store = LocalBlobStore::new(data_dir.clone());

        // Wire bot service
        let bot_service = BotService::new(
            SqliteBotRepository::new(db_pool.clone()),
            blob_store.clone(),
        );

        // Wire subscription service
        let subscription_service = SubscriptionService::new(SqliteSubscriptionRepository::new(
            db_pool.clone(),
        ));

        // Resolve credentials from the environment
        let secrets = EnvSecretProvider::new();

        let api_key = secrets
            .get(&config.generation.api_key_env)
            .unwrap_or_else(|| {
                tracing::warn!(
                    env = %config.generation.api_key_env,
                    "generation API key not set; chat sends will fail at the endpoint"
                );
                SecretString::from("")
            });
        let mut generation = GeminiClient::new(api_key, config.generation.model.clone());
        if let Some(ref base_url) = config.generation.base_url {
            generation = generation.with_base_url(base_url.clone());
        }

        let checkout = secrets
            .get(&config.billing.secret_key_env)
            .map(CheckoutClient::new);
        if checkout.is_none() {
            tracing::warn!(
                env = %config.billing.secret_key_env,
                "billing key not set; checkout is disabled"
            );
        }

        let webhook_secret = secrets.get(&config.billing.webhook_secret_env);

        Ok(Self {
            bot_service: Arc::new(bot_service),
            subscription_service: Arc::new(subscription_service),
            sessions: Arc::new(SessionRegistry::new()),
            blob_store,
            generation,
            checkout,
            webhook_secret,
            config,
            data_dir,
            db_pool,
        })
    }

    /// Chat options derived from the loaded configuration.
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            mark_failed_turns: self.config.chat.mark_failed_turns,
            history_char_limit: self.config.chat.history_char_limit,
        }
    }
}
