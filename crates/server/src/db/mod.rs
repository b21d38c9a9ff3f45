//! User persistence.
//!
//! # Database: `ecothread`
//!
//! ## Tables
//!
//! - `ecothread.users` - Accounts with Argon2 password hashes and profile fields
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! Marketplace state (cart, orders, listings) lives in the session, not here.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p ecothread-cli -- migrate
//! ```

pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use ecothread_core::{Email, UserId};

use crate::models::user::{NewUser, ProfileUpdate, User};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage for user accounts.
///
/// Implementations must make `create` atomic with respect to the email
/// uniqueness check.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Look up a user and their password hash by email.
    async fn find_credentials(&self, email: &Email)
    -> Result<Option<(User, String)>, RepositoryError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Merge profile fields into a user and refresh `updated_at`.
    ///
    /// Returns `None` if no user has this id.
    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, RepositoryError>;

    /// Raise a user's level by one. Returns `None` if no user has this id.
    async fn increment_level(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Check the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
