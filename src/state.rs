//! Application state shared across handlers and middleware.

use std::sync::Arc;

use crate::{
    auth::{AuthResolver, TokenCodec},
    config::AppConfig,
    database::Gateway,
    services::CompletionClient,
};

/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    gateway: Arc<dyn Gateway>,
    tokens: TokenCodec,
    chat: CompletionClient,
}

impl AppState {
    pub fn new(config: AppConfig, gateway: Arc<dyn Gateway>, chat: CompletionClient) -> Self {
        let tokens = TokenCodec::from_config(&config.security);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                tokens,
                chat,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }

    pub fn chat(&self) -> &CompletionClient {
        &self.inner.chat
    }

    pub fn resolver(&self) -> AuthResolver<'_> {
        AuthResolver::new(self.tokens(), self.gateway())
    }

    /// Whether auth cookies carry the `Secure` attribute
    pub fn cookie_secure(&self) -> bool {
        self.inner.config.security.cookie_secure
    }
}
