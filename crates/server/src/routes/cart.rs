//! Cart handlers. The cart lives in the session.

use axum::{Json, extract::Path};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use ecothread_core::ListingId;
use ecothread_core::cart::CartItem;
use ecothread_core::checkout::{Checkout, CheckoutPhase};
use ecothread_core::listings::find_listing;

use crate::error::{AppError, Result};
use crate::models::LoopSession;

/// Cart contents plus where checkout stands.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Display total, e.g. `"$105"`.
    pub total: String,
    pub item_count: u32,
    pub phase: CheckoutPhase,
}

impl From<&Checkout> for CartView {
    fn from(checkout: &Checkout) -> Self {
        let cart = checkout.cart();
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
            phase: checkout.phase(),
        }
    }
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub listing_id: ListingId,
}

/// Quantity change request.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub delta: i64,
}

/// Show the cart.
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let state = LoopSession::load(&session).await?;
    Ok(Json(CartView::from(&state.checkout)))
}

/// Add one unit of a listing.
#[tracing::instrument(skip(session))]
pub async fn add(session: Session, Json(request): Json<AddItemRequest>) -> Result<Json<CartView>> {
    let mut state = LoopSession::load(&session).await?;

    let listing = find_listing(&request.listing_id, &state.my_listings)
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;
    state.checkout.add_to_cart(listing)?;
    state.save(&session).await?;

    Ok(Json(CartView::from(&state.checkout)))
}

/// Change a line's quantity by `delta`. Quantities never drop below one.
pub async fn update(
    session: Session,
    Path(id): Path<ListingId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let mut state = LoopSession::load(&session).await?;

    state
        .checkout
        .update_quantity(&id, request.delta)?
        .ok_or_else(|| AppError::NotFound("Item not in cart".to_string()))?;
    state.save(&session).await?;

    Ok(Json(CartView::from(&state.checkout)))
}

/// Remove a line.
pub async fn remove(session: Session, Path(id): Path<ListingId>) -> Result<Json<CartView>> {
    let mut state = LoopSession::load(&session).await?;

    if !state.checkout.remove_from_cart(&id)? {
        return Err(AppError::NotFound("Item not in cart".to_string()));
    }
    state.save(&session).await?;

    Ok(Json(CartView::from(&state.checkout)))
}
