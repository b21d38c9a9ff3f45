//! Shopping cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::listings::Listing;
use crate::types::{ListingId, format_amount, parse_amount};

/// A listing in the cart with its quantity (always at least 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub listing: Listing,
    pub quantity: u32,
}

impl CartItem {
    /// Numeric line total; unparseable prices count as zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        parse_amount(&self.listing.price).unwrap_or_default() * Decimal::from(self.quantity)
    }
}

/// Ordered list of cart lines, at most one per listing id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a listing, merging with an existing line.
    pub fn add(&mut self, listing: Listing) {
        if let Some(line) = self.items.iter_mut().find(|i| i.listing.id == listing.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                listing,
                quantity: 1,
            });
        }
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ListingId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.listing.id != id);
        self.items.len() != before
    }

    /// Change a line's quantity by `delta`, never going below 1.
    ///
    /// Returns the new quantity, or `None` if the listing is not in the cart.
    pub fn update_quantity(&mut self, id: &ListingId, delta: i64) -> Option<u32> {
        let line = self.items.iter_mut().find(|i| &i.listing.id == id)?;
        let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(line.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Cart total formatted with two decimals, e.g. `"25.00"`.
    #[must_use]
    pub fn total(&self) -> String {
        format_amount(self.total_amount())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::listings::demo_listings;

    fn listing(id: &str, price: &str) -> Listing {
        let mut listing = demo_listings().remove(0);
        listing.id = ListingId::from(id);
        listing.price = price.to_owned();
        listing
    }

    #[test]
    fn test_add_same_listing_merges() {
        let mut cart = Cart::new();
        cart.add(listing("m1", "$45 CAD"));
        cart.add(listing("m1", "$45 CAD"));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_remove_only_that_line() {
        let mut cart = Cart::new();
        cart.add(listing("a", "$1 CAD"));
        cart.add(listing("b", "$2 CAD"));
        cart.add(listing("c", "$3 CAD"));
        assert!(cart.remove(&ListingId::from("b")));
        assert!(!cart.remove(&ListingId::from("b")));
        let ids: Vec<_> = cart.items().iter().map(|i| i.listing.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_quantity_never_below_one() {
        let mut cart = Cart::new();
        cart.add(listing("a", "$1 CAD"));
        let id = ListingId::from("a");
        assert_eq!(cart.update_quantity(&id, 3), Some(4));
        assert_eq!(cart.update_quantity(&id, -10), Some(1));
        assert_eq!(cart.update_quantity(&ListingId::from("zzz"), 1), None);
    }

    #[test]
    fn test_total_two_decimals() {
        let mut cart = Cart::new();
        cart.add(listing("a", "$10 CAD"));
        cart.add(listing("a", "$10 CAD"));
        cart.add(listing("b", "$5 CAD"));
        assert_eq!(cart.total(), "25.00");
    }

    #[test]
    fn test_total_treats_unparseable_as_zero() {
        let mut cart = Cart::new();
        cart.add(listing("a", "free"));
        cart.add(listing("b", "$7.5 CAD"));
        assert_eq!(cart.total(), "7.50");
        assert_eq!(Cart::new().total(), "0.00");
    }

    #[test]
    fn test_cart_item_json_is_flat() {
        let mut cart = Cart::new();
        cart.add(listing("m1", "$45 CAD"));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[0]["id"], "m1");
        assert_eq!(json[0]["quantity"], 1);
    }
}
