//! Seed the database with a demo account.

use tracing::info;

use ecothread_server::db::{self, PgUserStore};
use ecothread_server::models::RegistrationProfile;
use ecothread_server::services::auth::{AuthError, AuthService};

pub const DEMO_EMAIL: &str = "demo@ecothread.app";
pub const DEMO_NAME: &str = "Eco Looper";

/// Create the demo account. An existing account with the same email is
/// left alone.
///
/// # Errors
///
/// Returns an error if the database is unreachable or registration fails
/// for any reason other than a duplicate email.
pub async fn demo_account(
    email: &str,
    password: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgUserStore::new(pool);
    let auth = AuthService::new(&store);

    let mut words = name.split_whitespace();
    let profile = RegistrationProfile {
        name: Some(name.to_string()),
        first_name: words.next().map(String::from),
        last_name: Some(words.collect::<Vec<_>>().join(" ")),
        ..Default::default()
    };

    match auth.register(email, password, profile).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "Demo account created");
            Ok(())
        }
        Err(AuthError::UserAlreadyExists) => {
            info!(email, "Demo account already exists, nothing to do");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
