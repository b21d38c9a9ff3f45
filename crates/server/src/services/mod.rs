//! Business logic services.
//!
//! - `auth` - Registration, login, profile and level updates
//! - `assistant` - Gemini-backed styling, repair and verification helpers

pub mod assistant;
pub mod auth;
