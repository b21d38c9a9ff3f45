//! Domain models for the API server.

pub mod assistant;
pub mod session;
pub mod user;

pub use session::{ChatMessage, CurrentUser, LoopSession, keys as session_keys};
pub use user::{NewUser, ProfileUpdate, RegistrationProfile, User};
