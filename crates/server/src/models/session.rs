//! Session-related types.
//!
//! The session carries the signed-in user plus the per-visitor marketplace
//! state: cart and checkout phase, orders, published listings and the
//! assistant conversation.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use ecothread_core::checkout::Checkout;
use ecothread_core::listings::Listing;
use ecothread_core::orders::OrderBook;
use ecothread_core::{Email, UserId};

use crate::gemini::types::Role;
use crate::models::user::User;

/// Oldest chat messages are dropped beyond this many.
pub const MAX_CHAT_MESSAGES: usize = 40;

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name, used as the owner of published listings.
    pub name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// One turn of the assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Marketplace state for one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopSession {
    pub checkout: Checkout,
    pub orders: OrderBook,
    /// Listings this visitor published, newest first.
    pub my_listings: Vec<Listing>,
    pub chat: Vec<ChatMessage>,
}

impl Default for LoopSession {
    fn default() -> Self {
        Self {
            checkout: Checkout::new(),
            orders: OrderBook::seeded(),
            my_listings: Vec::new(),
            chat: Vec::new(),
        }
    }
}

impl LoopSession {
    /// Load the state from the session, or start a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session
            .get::<Self>(keys::LOOP_SESSION)
            .await?
            .unwrap_or_default())
    }

    /// Write the state back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::LOOP_SESSION, self).await
    }

    /// Write the state back and flush it to the store now, so concurrent
    /// requests on the same session see it before this one returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn persist(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        self.save(session).await?;
        session.save().await
    }

    /// Record a completed exchange with the assistant.
    pub fn push_exchange(&mut self, question: &str, reply: &str) {
        self.chat.push(ChatMessage {
            role: Role::User,
            text: question.to_string(),
        });
        self.chat.push(ChatMessage {
            role: Role::Model,
            text: reply.to_string(),
        });
        let excess = self.chat.len().saturating_sub(MAX_CHAT_MESSAGES);
        self.chat.drain(..excess);
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor's marketplace state.
    pub const LOOP_SESSION: &str = "loop_session";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_has_seeded_sale() {
        let state = LoopSession::default();
        assert_eq!(state.orders.all().len(), 1);
        assert!(state.checkout.cart().is_empty());
        assert!(state.my_listings.is_empty());
    }

    #[test]
    fn test_chat_history_is_bounded() {
        let mut state = LoopSession::default();
        for i in 0..30 {
            state.push_exchange(&format!("q{i}"), &format!("a{i}"));
        }
        assert_eq!(state.chat.len(), MAX_CHAT_MESSAGES);
        assert_eq!(state.chat.first().map(|m| m.role), Some(Role::User));
        assert_eq!(state.chat.last().map(|m| m.text.as_str()), Some("a29"));
    }
}
