//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/register          - Create an account and sign in
//! POST   /api/auth/login             - Sign in
//! POST   /api/auth/logout            - Sign out
//! GET    /api/auth/me                - Current user
//! PUT    /api/user/profile/{userId}  - Merge profile fields
//!
//! # Marketplace
//! GET    /api/listings               - Demo and published listings, filtered
//! GET    /api/listings/options       - Choices for the listing form
//! POST   /api/listings               - Publish a listing (requires auth)
//! DELETE /api/listings/{id}          - Remove a published listing
//!
//! # Cart and checkout (session state)
//! GET    /api/cart                   - Cart contents and checkout phase
//! POST   /api/cart/items             - Add a listing
//! PATCH  /api/cart/items/{id}        - Change a line's quantity
//! DELETE /api/cart/items/{id}        - Remove a line
//! POST   /api/checkout/open          - Open the payment form (requires auth)
//! POST   /api/checkout/cancel        - Close the payment form
//! POST   /api/checkout/pay           - Pay and place orders (requires auth)
//!
//! # Orders
//! GET    /api/orders                 - Purchases and sales
//! GET    /api/orders/track?q=        - Look up by order id or tracking number
//! POST   /api/orders/{id}/ship       - Confirm shipping of a pending sale
//! PUT    /api/orders/{id}/status     - Set an order's status (requires auth)
//!
//! # ECO Maze
//! GET    /api/maze                   - Progress for the current user
//! POST   /api/maze/advance           - Advance one step (requires auth)
//!
//! # Assistant (Gemini)
//! GET    /api/assistant/chat         - Greeting and conversation so far
//! POST   /api/assistant/chat         - Send a chat message
//! POST   /api/assistant/outfits      - Outfit ideas for a garment
//! POST   /api/assistant/repair       - Repair guide
//! POST   /api/assistant/upcycle      - Upcycling projects from a photo
//! POST   /api/assistant/verify       - Verify a photo proves an action
//! POST   /api/assistant/shops        - Nearby repair and thrift shops
//! ```

pub mod assistant;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod listings;
pub mod maze;
pub mod orders;
pub mod profile;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the listing routes router.
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::index).post(listings::publish))
        .route("/options", get(listings::options))
        .route("/{id}", delete(listings::remove))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/open", post(checkout::open))
        .route("/cancel", post(checkout::cancel))
        .route("/pay", post(checkout::pay))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/track", get(orders::track))
        .route("/{id}/ship", post(orders::ship))
        .route("/{id}/status", put(orders::set_status))
}

/// Create the maze routes router.
pub fn maze_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(maze::show))
        .route("/advance", post(maze::advance))
}

/// Create the assistant routes router.
pub fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", get(assistant::history).post(assistant::chat))
        .route("/outfits", post(assistant::outfits))
        .route("/repair", post(assistant::repair))
        .route("/upcycle", post(assistant::upcycle))
        .route("/verify", post(assistant::verify))
        .route("/shops", post(assistant::shops))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .route("/api/user/profile/{user_id}", put(profile::update))
        .nest("/api/listings", listing_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/checkout", checkout_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/maze", maze_routes())
        .nest("/api/assistant", assistant_routes())
}
