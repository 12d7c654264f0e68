use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, Gateway, MemoryGateway, PgGateway};
use crate::server;
use crate::services::CompletionClient;
use crate::state::AppState;

pub async fn handle(mut config: AppConfig, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    warn_on_weak_settings(&config);

    let gateway: Arc<dyn Gateway> = if in_memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        Arc::new(MemoryGateway::new())
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        Arc::new(PgGateway::new(pool))
    };

    let chat = CompletionClient::from_config(&config.ai).context("invalid AI configuration")?;
    let state = AppState::new(config, gateway, chat);

    server::serve(state).await.context("server error")
}

fn warn_on_weak_settings(config: &AppConfig) {
    if config.uses_default_secret() {
        if config.is_production() {
            tracing::error!("JWT_SECRET is not set in production; tokens are signed with the public development secret");
        } else {
            tracing::warn!("JWT_SECRET is not set; using the development default");
        }
    }
    if config.ai.api_key.is_none() {
        tracing::warn!("AI_API_KEY is not set; chat requests are sent without credentials");
    }
}
