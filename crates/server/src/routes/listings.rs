//! Marketplace listing handlers.
//!
//! The demo catalogue is shared by everyone; listings a visitor publishes
//! live in their session and are shown ahead of the catalogue.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;
use tower_sessions::Session;

use ecothread_core::ListingId;
use ecothread_core::listings::{
    FormOptions, Listing, ListingDraft, ListingFilter, demo_listings, form_options,
};

use crate::error::{AppError, AuthOperation, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{LoopSession, User};
use crate::routes::auth::SuccessResponse;
use crate::state::AppState;

/// Filtered marketplace.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsResponse {
    pub listings: Vec<Listing>,
    /// Everything this visitor published, unfiltered.
    pub my_listings: Vec<Listing>,
}

/// A freshly published listing and the user's new level.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub listing: Listing,
    pub user: User,
}

/// List the session's own listings and the demo catalogue through the
/// filter. Price bounds are clamped the way the slider clamps them.
pub async fn index(
    session: Session,
    Query(query): Query<ListingFilter>,
) -> Result<Json<ListingsResponse>> {
    let state = LoopSession::load(&session).await?;

    let mut filter = ListingFilter {
        min_price: ListingFilter::default().min_price,
        ..query.clone()
    };
    filter.set_max_price(query.max_price);
    filter.set_min_price(query.min_price);

    let catalogue = demo_listings();
    let listings = filter.apply(state.my_listings.iter().chain(catalogue.iter()));

    Ok(Json(ListingsResponse {
        listings,
        my_listings: state.my_listings,
    }))
}

/// Publish a draft as the signed-in user. Every broken rule is reported.
pub async fn publish(
    State(app): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Json(draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<PublishResponse>)> {
    let listing = draft.publish(&current.name, Utc::now().timestamp_millis())?;

    let mut state = LoopSession::load(&session).await?;
    state.my_listings.insert(0, listing.clone());
    state.save(&session).await?;

    let user = app
        .auth()
        .increment_level(current.id)
        .await
        .map_err(AppError::auth(AuthOperation::Session))?;

    add_breadcrumb("listings", "Listing published", Some(&[("listing_id", listing.id.as_str())]));
    tracing::info!(user_id = %current.id, listing_id = %listing.id, "Listing published");

    Ok((
        StatusCode::CREATED,
        Json(PublishResponse {
            success: true,
            listing,
            user,
        }),
    ))
}

/// Choices for the "list an item" form.
pub async fn options() -> Json<FormOptions> {
    Json(form_options())
}

/// Remove one of the session's own listings.
pub async fn remove(
    session: Session,
    Path(id): Path<ListingId>,
) -> Result<Json<SuccessResponse>> {
    let mut state = LoopSession::load(&session).await?;

    let before = state.my_listings.len();
    state.my_listings.retain(|listing| listing.id != id);
    if state.my_listings.len() == before {
        return Err(AppError::NotFound("Listing not found".to_string()));
    }

    state.save(&session).await?;
    Ok(Json(SuccessResponse::OK))
}
