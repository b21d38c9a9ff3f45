//! Sign-in and sign-up form checks, run before any request is sent.

use ecothread_core::Email;

use crate::types::SignupProfile;

/// Shortest password the forms accept.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// First problem found in a form. `Display` gives the message to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email address is required.")]
    EmailRequired,
    #[error("Please enter a valid email address (e.g., user@example.com).")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

fn check_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// The sign-in form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_credentials(&self.email, &self.password)
    }
}

/// The sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub dob: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_credentials(&self.email, &self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    /// Profile derived from the form. The display name falls back to the
    /// part of the email before `@`; the first word of the full name is the
    /// first name and the rest is the last name.
    #[must_use]
    pub fn profile(&self) -> SignupProfile {
        let full_name = self.full_name.trim();
        let mut words = full_name.split_whitespace();
        let first_name = words.next().unwrap_or_default().to_string();
        let last_name = words.collect::<Vec<_>>().join(" ");

        let name = if full_name.is_empty() {
            self.email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            full_name.to_string()
        };

        SignupProfile {
            name,
            first_name,
            last_name,
            phone: self.phone.trim().to_string(),
            dob: self.dob.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_checks_in_order() {
        assert_eq!(login("  ", "x").validate(), Err(ValidationError::EmailRequired));
        assert_eq!(login("ada", "secret1").validate(), Err(ValidationError::InvalidEmail));
        assert_eq!(
            login("ada@example", "secret1").validate(),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            login("ada@example.com", "12345").validate(),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(login("ada@example.com", "123456").validate(), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address (e.g., user@example.com)."
        );
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match."
        );
    }

    #[test]
    fn test_signup_requires_matching_passwords() {
        let form = SignupForm {
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        let form = SignupForm {
            confirm_password: "secret1".to_string(),
            ..form
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_profile_splits_full_name() {
        let form = SignupForm {
            full_name: "Ada King Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let profile = form.profile();
        assert_eq!(profile.name, "Ada King Lovelace");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "King Lovelace");
    }

    #[test]
    fn test_profile_name_falls_back_to_email() {
        let form = SignupForm {
            email: "looper@example.com".to_string(),
            ..Default::default()
        };
        let profile = form.profile();
        assert_eq!(profile.name, "looper");
        assert!(profile.first_name.is_empty());
        assert!(profile.last_name.is_empty());
    }
}
