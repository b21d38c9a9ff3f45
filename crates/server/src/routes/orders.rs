//! Order history handlers.

use axum::{
    Json,
    extract::{Path, Query},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use ecothread_core::orders::Order;
use ecothread_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::LoopSession;

/// Orders split by side of the trade.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub purchases: Vec<Order>,
    pub sales: Vec<Order>,
    pub pending_sales_count: usize,
}

/// A single order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

impl OrderResponse {
    const fn new(order: Order) -> Self {
        Self {
            success: true,
            order,
        }
    }
}

/// Tracking lookup query.
#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    #[serde(default)]
    pub q: String,
}

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// Purchases and sales, newest first.
pub async fn index(session: Session) -> Result<Json<OrdersResponse>> {
    let state = LoopSession::load(&session).await?;
    let orders = &state.orders;

    Ok(Json(OrdersResponse {
        purchases: orders.purchases().cloned().collect(),
        sales: orders.sales().cloned().collect(),
        pending_sales_count: orders.pending_sales_count(),
    }))
}

/// Find an order by id or tracking number, ignoring case.
pub async fn track(session: Session, Query(query): Query<TrackQuery>) -> Result<Json<OrderResponse>> {
    let state = LoopSession::load(&session).await?;

    state
        .orders
        .find_by_reference(&query.q)
        .cloned()
        .map(|order| Json(OrderResponse::new(order)))
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Mark a pending sale as shipped.
pub async fn ship(session: Session, Path(id): Path<OrderId>) -> Result<Json<OrderResponse>> {
    let mut state = LoopSession::load(&session).await?;
    let order = state.orders.confirm_shipping(&id)?.clone();
    state.save(&session).await?;

    tracing::info!(order_id = %id, "Shipping confirmed");
    Ok(Json(OrderResponse::new(order)))
}

/// Set any order's status.
pub async fn set_status(
    RequireAuth(current): RequireAuth,
    session: Session,
    Path(id): Path<OrderId>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<OrderResponse>> {
    let mut state = LoopSession::load(&session).await?;
    let order = state.orders.set_status(&id, request.status)?.clone();
    state.save(&session).await?;

    tracing::info!(user_id = %current.id, order_id = %id, status = %request.status, "Order status updated");
    Ok(Json(OrderResponse::new(order)))
}
