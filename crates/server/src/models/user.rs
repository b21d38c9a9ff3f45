//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use ecothread_core::{Email, UserId};

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// A marketplace user (domain type). The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    /// Display name.
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// Empty until the user picks one.
    pub username: String,
    /// Empty string when not given.
    pub phone: String,
    /// Date of birth as typed, empty when not given.
    pub dob: String,
    pub style_preferences: Vec<String>,
    /// Data URI or image URL.
    pub avatar: String,
    /// ECO Maze level, starting at 1.
    pub current_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields supplied at registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationProfile {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
}

/// Everything the store needs to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub dob: String,
    pub avatar: String,
}

impl NewUser {
    /// Build a new user from registration input. Missing names fall back to
    /// the email's local part.
    #[must_use]
    pub fn from_registration(email: Email, password_hash: String, profile: RegistrationProfile) -> Self {
        let first_name = profile.first_name.unwrap_or_default();
        let last_name = profile.last_name.unwrap_or_default();
        let name = profile
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                let full = format!("{first_name} {last_name}");
                let full = full.trim();
                (!full.is_empty()).then(|| full.to_string())
            })
            .unwrap_or_else(|| email.local_part().to_string());
        let avatar = default_avatar(&name);

        Self {
            email,
            password_hash,
            name,
            first_name,
            last_name,
            phone: profile.phone.unwrap_or_default(),
            dob: profile.dob.unwrap_or_default(),
            avatar,
        }
    }
}

/// Partial profile update. Absent fields are left unchanged; fields not
/// listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub style_preferences: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub current_level: Option<i32>,
}

impl ProfileUpdate {
    /// Merge into `user`. Does not touch `updated_at`.
    pub fn apply_to(&self, user: &mut User) {
        fn set<T: Clone>(field: &mut T, value: Option<&T>) {
            if let Some(v) = value {
                field.clone_from(v);
            }
        }

        set(&mut user.name, self.name.as_ref());
        set(&mut user.first_name, self.first_name.as_ref());
        set(&mut user.last_name, self.last_name.as_ref());
        set(&mut user.username, self.username.as_ref());
        set(&mut user.phone, self.phone.as_ref());
        set(&mut user.dob, self.dob.as_ref());
        set(&mut user.style_preferences, self.style_preferences.as_ref());
        set(&mut user.avatar, self.avatar.as_ref());
        set(&mut user.current_level, self.current_level.as_ref());
    }
}

/// Generated initials avatar for a display name.
#[must_use]
pub fn default_avatar(name: &str) -> String {
    Url::parse_with_params(
        AVATAR_SERVICE,
        &[("name", name), ("background", "18181b"), ("color", "ffffff")],
    )
    .map(String::from)
    .unwrap_or_else(|_| AVATAR_SERVICE.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("ada@example.com").unwrap(),
            name: "Ada Lovelace".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: String::new(),
            phone: String::new(),
            dob: String::new(),
            style_preferences: Vec::new(),
            avatar: default_avatar("Ada Lovelace"),
            current_level: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_json_is_camel_case() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["currentLevel"], 1);
        assert_eq!(json["stylePreferences"], serde_json::json!([]));
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_profile_update_merges_present_fields() {
        let mut user = user();
        let update: ProfileUpdate = serde_json::from_str(
            r#"{"username":"ada","stylePreferences":["Vintage"],"isAdmin":true}"#,
        )
        .unwrap();
        update.apply_to(&mut user);

        assert_eq!(user.username, "ada");
        assert_eq!(user.style_preferences, ["Vintage"]);
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.current_level, 1);
    }

    #[test]
    fn test_registration_name_fallbacks() {
        let email = Email::parse("grace@example.com").unwrap();

        let from_parts = NewUser::from_registration(
            email.clone(),
            "hash".to_string(),
            RegistrationProfile {
                first_name: Some("Grace".to_string()),
                last_name: Some("Hopper".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(from_parts.name, "Grace Hopper");

        let bare = NewUser::from_registration(email, "hash".to_string(), RegistrationProfile::default());
        assert_eq!(bare.name, "grace");
        assert_eq!(bare.phone, "");
    }

    #[test]
    fn test_default_avatar_encodes_name() {
        let avatar = default_avatar("Ada Lovelace");
        assert!(avatar.starts_with("https://ui-avatars.com/api/?name=Ada+Lovelace"));
    }
}
