//! `PostgreSQL` user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ecothread_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::user::{NewUser, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, email, name, first_name, last_name, username, phone, dob, \
                            style_preferences, avatar, current_level, created_at, updated_at";

/// Database row for `ecothread.users` (without the password hash).
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: Email,
    name: String,
    first_name: String,
    last_name: String,
    username: String,
    phone: String,
    dob: String,
    style_preferences: Vec<String>,
    avatar: String,
    current_level: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            phone: row.phone,
            dob: row.dob,
            style_preferences: row.style_preferences,
            avatar: row.avatar,
            current_level: row.current_level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// User store backed by the `ecothread.users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO ecothread.users \
                 (email, password_hash, name, first_name, last_name, phone, dob, avatar) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(&user.dob)
            .bind(&user.avatar)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        Ok(row.into())
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM ecothread.users WHERE email = $1");

        let row = sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| (User::from(r.user), r.password_hash)))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM ecothread.users WHERE id = $1");

        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "UPDATE ecothread.users SET \
                 name = COALESCE($2, name), \
                 first_name = COALESCE($3, first_name), \
                 last_name = COALESCE($4, last_name), \
                 username = COALESCE($5, username), \
                 phone = COALESCE($6, phone), \
                 dob = COALESCE($7, dob), \
                 style_preferences = COALESCE($8, style_preferences), \
                 avatar = COALESCE($9, avatar), \
                 current_level = COALESCE($10, current_level), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(update.name.as_deref())
            .bind(update.first_name.as_deref())
            .bind(update.last_name.as_deref())
            .bind(update.username.as_deref())
            .bind(update.phone.as_deref())
            .bind(update.dob.as_deref())
            .bind(update.style_preferences.as_deref())
            .bind(update.avatar.as_deref())
            .bind(update.current_level)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from))
    }

    async fn increment_level(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "UPDATE ecothread.users \
             SET current_level = current_level + 1, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
