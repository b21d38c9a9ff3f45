//! Order history, tracking lookup and seller fulfillment.

use serde::{Deserialize, Serialize};

use crate::types::{ListingId, OrderId, OrderStatus, OrderType, TrackingNumber};

/// Placeholder used for transit fields that have not happened yet.
pub const PENDING_FIELD: &str = "--";

/// One step in an order's shipping history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitEvent {
    pub status: String,
    pub time: String,
    pub location: String,
    pub completed: bool,
}

impl TransitEvent {
    /// A completed step.
    #[must_use]
    pub fn done(status: &str, time: &str, location: &str) -> Self {
        Self {
            status: status.to_owned(),
            time: time.to_owned(),
            location: location.to_owned(),
            completed: true,
        }
    }

    /// A step that has not happened yet.
    #[must_use]
    pub fn upcoming(status: &str, location: &str) -> Self {
        Self {
            status: status.to_owned(),
            time: PENDING_FIELD.to_owned(),
            location: location.to_owned(),
            completed: false,
        }
    }
}

/// A purchase or sale made by the session's user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub item_id: ListingId,
    pub item_name: String,
    pub item_image: String,
    pub price: String,
    pub date: String,
    pub status: OrderStatus,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub counterparty: String,
    pub shipping_address: String,
    pub tracking_number: TrackingNumber,
    pub transit_history: Vec<TransitEvent>,
}

impl Order {
    /// Whether `query` names this order by id or tracking number,
    /// ignoring case and surrounding whitespace.
    #[must_use]
    pub fn matches_reference(&self, query: &str) -> bool {
        let query = query.trim();
        !query.is_empty()
            && (self.id.as_str().eq_ignore_ascii_case(query)
                || self.tracking_number.as_str().eq_ignore_ascii_case(query))
    }
}

/// Errors from order updates.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(OrderId),
    #[error("order {0} is not a pending sale")]
    NotPendingSale(OrderId),
}

/// The session's orders, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    /// An empty order book.
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// The order book every new session starts with: one sale in transit.
    #[must_use]
    pub fn seeded() -> Self {
        let sale = Order {
            id: OrderId::from("ORD-8291"),
            item_id: ListingId::from("m1"),
            item_name: "Vintage Levi's 501".to_owned(),
            item_image: "https://images.unsplash.com/photo-1542272604-787c3835535d?q=80&w=400&h=400&auto=format&fit=crop".to_owned(),
            price: "$45 CAD".to_owned(),
            date: "2023-10-24".to_owned(),
            status: OrderStatus::Shipped,
            order_type: OrderType::Sale,
            counterparty: "Marcus J.".to_owned(),
            shipping_address: "123 Eco Way, Vancouver, BC V6B 1A1".to_owned(),
            tracking_number: TrackingNumber::from("LP-77281902"),
            transit_history: vec![
                TransitEvent::done("Order Placed", "Oct 24, 09:00 AM", "Vancouver, BC"),
                TransitEvent::done("Processing", "Oct 24, 11:30 AM", "Vancouver Hub"),
                TransitEvent::done("Shipped", "Oct 25, 08:00 AM", "Vancouver Hub"),
                TransitEvent {
                    status: "In Transit".to_owned(),
                    time: "Oct 25, 02:00 PM".to_owned(),
                    location: "Burnaby, BC".to_owned(),
                    completed: false,
                },
                TransitEvent::upcoming("Delivered", PENDING_FIELD),
            ],
        };
        Self { orders: vec![sale] }
    }

    /// Put new orders in front of the existing ones, keeping their order.
    pub fn prepend(&mut self, new_orders: impl IntoIterator<Item = Order>) {
        let mut combined: Vec<Order> = new_orders.into_iter().collect();
        combined.append(&mut self.orders);
        self.orders = combined;
    }

    #[must_use]
    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    /// Orders where the user is the seller.
    pub fn sales(&self) -> impl Iterator<Item = &Order> {
        self.of_type(OrderType::Sale)
    }

    /// Orders where the user is the buyer.
    pub fn purchases(&self) -> impl Iterator<Item = &Order> {
        self.of_type(OrderType::Purchase)
    }

    fn of_type(&self, order_type: OrderType) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.order_type == order_type)
    }

    /// Sales still waiting for the seller to ship.
    #[must_use]
    pub fn pending_sales_count(&self) -> usize {
        self.sales()
            .filter(|o| o.status == OrderStatus::Pending)
            .count()
    }

    /// Find an order by id or tracking number.
    #[must_use]
    pub fn find_by_reference(&self, query: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.matches_reference(query))
    }

    /// Set an order's status unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if no order has this id.
    pub fn set_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<&Order, OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;
        order.status = status;
        Ok(order)
    }

    /// Seller marks a pending sale as shipped.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] for unknown ids and
    /// [`OrderError::NotPendingSale`] for purchases or sales already shipped.
    pub fn confirm_shipping(&mut self, id: &OrderId) -> Result<&Order, OrderError> {
        let order = self
            .orders
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| OrderError::NotFound(id.clone()))?;

        if order.order_type != OrderType::Sale || order.status != OrderStatus::Pending {
            return Err(OrderError::NotPendingSale(id.clone()));
        }

        self.set_status(id, OrderStatus::Shipped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn order(id: &str, order_type: OrderType, status: OrderStatus) -> Order {
        let mut order = OrderBook::seeded().all()[0].clone();
        order.id = OrderId::from(id);
        order.tracking_number = TrackingNumber::new(format!("LP-{id}"));
        order.order_type = order_type;
        order.status = status;
        order
    }

    #[test]
    fn test_seeded_sale() {
        let book = OrderBook::seeded();
        assert_eq!(book.all().len(), 1);
        let sale = &book.all()[0];
        assert_eq!(sale.id.as_str(), "ORD-8291");
        assert_eq!(sale.order_type, OrderType::Sale);
        assert_eq!(sale.status, OrderStatus::Shipped);
        assert_eq!(sale.transit_history.len(), 5);
        assert_eq!(
            sale.transit_history.iter().filter(|e| e.completed).count(),
            3
        );
        assert_eq!(book.pending_sales_count(), 0);
    }

    #[test]
    fn test_partition_is_exclusive() {
        let mut book = OrderBook::seeded();
        book.prepend([
            order("ORD-1001", OrderType::Purchase, OrderStatus::Pending),
            order("ORD-1002", OrderType::Sale, OrderStatus::Pending),
        ]);
        assert_eq!(book.sales().count() + book.purchases().count(), book.all().len());
        assert!(book.sales().all(|o| o.order_type == OrderType::Sale));
        assert_eq!(book.pending_sales_count(), 1);
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut book = OrderBook::seeded();
        book.prepend([
            order("ORD-1001", OrderType::Purchase, OrderStatus::Pending),
            order("ORD-1002", OrderType::Purchase, OrderStatus::Pending),
        ]);
        let ids: Vec<_> = book.all().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["ORD-1001", "ORD-1002", "ORD-8291"]);
    }

    #[test]
    fn test_find_by_reference_ignores_case() {
        let book = OrderBook::seeded();
        assert!(book.find_by_reference("ord-8291").is_some());
        assert!(book.find_by_reference("lp-77281902").is_some());
        assert!(book.find_by_reference("  LP-77281902 ").is_some());
        assert!(book.find_by_reference("ORD-0000").is_none());
        assert!(book.find_by_reference("").is_none());
    }

    #[test]
    fn test_confirm_shipping() {
        let mut book = OrderBook::new();
        book.prepend([
            order("ORD-2000", OrderType::Sale, OrderStatus::Pending),
            order("ORD-2001", OrderType::Purchase, OrderStatus::Pending),
        ]);

        let shipped = book.confirm_shipping(&OrderId::from("ORD-2000")).unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        assert_eq!(
            book.confirm_shipping(&OrderId::from("ORD-2000")),
            Err(OrderError::NotPendingSale(OrderId::from("ORD-2000")))
        );
        assert_eq!(
            book.confirm_shipping(&OrderId::from("ORD-2001")),
            Err(OrderError::NotPendingSale(OrderId::from("ORD-2001")))
        );
        assert_eq!(
            book.confirm_shipping(&OrderId::from("ORD-9999")),
            Err(OrderError::NotFound(OrderId::from("ORD-9999")))
        );
    }

    #[test]
    fn test_set_status() {
        let mut book = OrderBook::seeded();
        let id = OrderId::from("ORD-8291");
        assert_eq!(
            book.set_status(&id, OrderStatus::Delivered).unwrap().status,
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_order_json_uses_type_key() {
        let json = serde_json::to_value(&OrderBook::seeded().all()[0]).unwrap();
        assert_eq!(json["type"], "Sale");
        assert_eq!(json["trackingNumber"], "LP-77281902");
        assert_eq!(json["transitHistory"][0]["status"], "Order Placed");
    }
}
