//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::UserStore;
use crate::error::AppError;
use crate::gemini::{GeminiClient, GeminiError};
use crate::services::assistant::Assistant;
use crate::services::auth::AuthService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the user store and
/// the Gemini client when an API key is configured.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    users: Arc<dyn UserStore>,
    gemini: Option<GeminiClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini HTTP client cannot be built.
    pub fn new(config: ServerConfig, users: Arc<dyn UserStore>) -> Result<Self, GeminiError> {
        let gemini = config.gemini.as_ref().map(GeminiClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                gemini,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Auth service over the user store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users())
    }

    /// The styling assistant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AssistantUnavailable`] when no Gemini API key is
    /// configured.
    pub fn assistant(&self) -> Result<Assistant<'_>, AppError> {
        match (&self.inner.gemini, &self.inner.config.gemini) {
            (Some(client), Some(config)) => Ok(Assistant::new(client, config)),
            _ => Err(AppError::AssistantUnavailable),
        }
    }
}
