//! ECOthread Core - Shared domain types and marketplace logic.
//!
//! This crate provides the types and rules used across all ECOthread components:
//! - `server` - JSON HTTP API (auth, profile, marketplace, assistant)
//! - `client` - Typed client for the auth/profile API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Time and randomness are passed in by the caller so
//! every rule here can be tested deterministically.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices, and statuses
//! - [`listings`] - Marketplace listings, filters, and the "list an item" draft
//! - [`cart`] - Cart lines, quantities, and totals
//! - [`checkout`] - The checkout state machine
//! - [`orders`] - Order history, tracking lookup, and shipping updates
//! - [`maze`] - ECO Maze progress derived from the user's level

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod listings;
pub mod maze;
pub mod orders;
pub mod types;

pub use types::*;
