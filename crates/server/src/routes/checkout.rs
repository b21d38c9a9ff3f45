//! Checkout handlers.
//!
//! Payment is simulated: after the configured delay every cart line becomes
//! a pending purchase and the buyer's level goes up by one.

use axum::{Json, extract::State};
use chrono::Local;
use serde::Serialize;
use tower_sessions::Session;
use tracing::Instrument;

use ecothread_core::UserId;
use ecothread_core::checkout::{CardDetails, CheckoutError};
use ecothread_core::orders::Order;

use crate::error::{AppError, AuthOperation, Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::{LoopSession, User};
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Result of a completed payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub orders: Vec<Order>,
    pub user: User,
}

/// Open the payment form. Signed-out visitors are asked to log in.
pub async fn open(OptionalAuth(user): OptionalAuth, session: Session) -> Result<Json<CartView>> {
    let mut state = LoopSession::load(&session).await?;
    state.checkout.open_payment(user.is_some())?;
    state.save(&session).await?;
    Ok(Json(CartView::from(&state.checkout)))
}

/// Close the payment form without paying.
pub async fn cancel(session: Session) -> Result<Json<CartView>> {
    let mut state = LoopSession::load(&session).await?;
    state.checkout.cancel_payment();
    state.save(&session).await?;
    Ok(Json(CartView::from(&state.checkout)))
}

/// Pay for the cart.
///
/// The processing phase is flushed to the store before the delay, so cart
/// edits made meanwhile are rejected. The rest runs in its own task and
/// completes even if the client goes away.
#[tracing::instrument(skip_all, fields(user_id))]
pub async fn pay(
    State(app): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Json(card): Json<CardDetails>,
) -> Result<Json<PaymentResponse>> {
    let current = user.ok_or(CheckoutError::LoginRequired)?;
    tracing::Span::current().record("user_id", tracing::field::display(current.id));

    let mut state = LoopSession::load(&session).await?;
    state.checkout.begin_processing(&card)?;
    state.persist(&session).await?;

    let completion = tokio::spawn(
        complete(app, session, state, current.id).instrument(tracing::Span::current()),
    );
    let (placed, user) = completion
        .await
        .map_err(|e| AppError::Internal(format!("checkout task failed: {e}")))??;

    Ok(Json(PaymentResponse {
        success: true,
        orders: placed,
        user,
    }))
}

async fn complete(
    app: AppState,
    session: Session,
    mut state: LoopSession,
    user_id: UserId,
) -> Result<(Vec<Order>, User)> {
    tokio::time::sleep(app.config().checkout_delay).await;

    let placed = {
        let LoopSession {
            checkout, orders, ..
        } = &mut state;
        checkout.complete_payment(orders, &mut rand::rng(), Local::now().naive_local())?
    };
    state.checkout.acknowledge_success();
    state.persist(&session).await?;

    let user = app
        .auth()
        .increment_level(user_id)
        .await
        .map_err(AppError::auth(AuthOperation::Session))?;

    let count = placed.len().to_string();
    add_breadcrumb("checkout", "Payment completed", Some(&[("orders", count.as_str())]));
    tracing::info!(orders = placed.len(), level = user.current_level, "Checkout completed");

    Ok((placed, user))
}
