//! Authentication service.
//!
//! Password registration and login, profile updates and the gamification
//! level, over any [`UserStore`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use ecothread_core::{Email, UserId};

use crate::db::{RepositoryError, UserStore};
use crate::models::user::{NewUser, ProfileUpdate, RegistrationProfile, User};

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank,
    /// `AuthError::InvalidEmail` if the email format is invalid and
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: RegistrationProfile,
    ) -> Result<User, AuthError> {
        validate_presence(email, password)?;
        let email = Email::parse(email.trim())?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser::from_registration(email, password_hash, profile))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// malformed, or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_presence(email, password)?;
        let email = Email::parse(email.trim()).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .find_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Apply a profile update to the user with id `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the id is malformed or unknown.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<User, AuthError> {
        let id: UserId = user_id.parse().map_err(|_| AuthError::UserNotFound)?;
        self.users
            .update_profile(id, update)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Advance the user one step through the ECO Maze.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn increment_level(&self, user_id: UserId) -> Result<User, AuthError> {
        let user = self
            .users
            .increment_level(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        tracing::debug!(user_id = %user.id, level = user.current_level, "Level increased");
        Ok(user)
    }
}

/// Both credentials must be present. Strength rules are a client concern.
fn validate_presence(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
