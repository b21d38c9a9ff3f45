//! Google Gemini (Generative Language API) integration.
//!
//! Only the pieces the assistant needs: plain and streamed
//! `generateContent`, inline JPEG input, JSON-schema output and the
//! Google Maps grounding tool.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
