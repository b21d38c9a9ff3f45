//! Checkout state machine.
//!
//! ```text
//! Browsing -> CartPopulated -> PaymentOpen -> Processing -> Success -> Browsing
//! ```
//!
//! Payment always succeeds once processing starts: there is no payment
//! provider, only a card-number presence check.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::listings::Listing;
use crate::orders::{Order, OrderBook, PENDING_FIELD, TransitEvent};
use crate::types::{ListingId, OrderId, OrderStatus, OrderType, TrackingNumber};

/// Counterparty recorded when a listing has no owner.
pub const DEFAULT_COUNTERPARTY: &str = "EcoLooper";

/// Shipping address recorded on every purchase.
pub const DEFAULT_SHIPPING_ADDRESS: &str = "My Home Address, Vancouver, BC";

/// Where the checkout flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutPhase {
    #[default]
    Browsing,
    CartPopulated,
    PaymentOpen,
    Processing,
    Success,
}

/// Card details typed into the payment form. Only presence of the number
/// is checked.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDetails {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Errors from checkout transitions.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout needs a signed-in user.
    #[error("please log in to check out")]
    LoginRequired,
    /// Nothing to pay for.
    #[error("your cart is empty")]
    EmptyCart,
    /// The payment form has no card number.
    #[error("card number is required")]
    MissingCardNumber,
    /// The transition is not allowed from the current phase.
    #[error("cannot {action} while checkout is {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: CheckoutPhase,
    },
}

/// Cart plus checkout phase for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    cart: Cart,
    phase: CheckoutPhase,
}

impl Checkout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Re-derive the phase after the cart changed.
    fn sync_phase(&mut self) {
        self.phase = match (self.phase, self.cart.is_empty()) {
            (CheckoutPhase::PaymentOpen, false) => CheckoutPhase::PaymentOpen,
            (_, true) => CheckoutPhase::Browsing,
            (_, false) => CheckoutPhase::CartPopulated,
        };
    }

    fn ensure_not_processing(&self, action: &'static str) -> Result<(), CheckoutError> {
        if self.phase == CheckoutPhase::Processing {
            return Err(CheckoutError::InvalidPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Add one unit of a listing to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPhase`] while a payment is processing.
    pub fn add_to_cart(&mut self, listing: Listing) -> Result<(), CheckoutError> {
        self.ensure_not_processing("add to cart")?;
        self.cart.add(listing);
        self.sync_phase();
        Ok(())
    }

    /// Remove a cart line. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPhase`] while a payment is processing.
    pub fn remove_from_cart(&mut self, id: &ListingId) -> Result<bool, CheckoutError> {
        self.ensure_not_processing("remove from cart")?;
        let removed = self.cart.remove(id);
        self.sync_phase();
        Ok(removed)
    }

    /// Change a line's quantity by `delta` (minimum 1).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPhase`] while a payment is processing.
    pub fn update_quantity(
        &mut self,
        id: &ListingId,
        delta: i64,
    ) -> Result<Option<u32>, CheckoutError> {
        self.ensure_not_processing("change quantity")?;
        Ok(self.cart.update_quantity(id, delta))
    }

    /// Open the payment form.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::LoginRequired`] when signed out,
    /// [`CheckoutError::EmptyCart`] when there is nothing to buy.
    pub fn open_payment(&mut self, is_authenticated: bool) -> Result<(), CheckoutError> {
        if !is_authenticated {
            return Err(CheckoutError::LoginRequired);
        }
        self.ensure_not_processing("open payment")?;
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.phase = CheckoutPhase::PaymentOpen;
        Ok(())
    }

    /// Close the payment form without paying.
    pub fn cancel_payment(&mut self) {
        if self.phase == CheckoutPhase::PaymentOpen {
            self.phase = CheckoutPhase::CartPopulated;
            self.sync_phase();
        }
    }

    /// Submit the payment form.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::InvalidPhase`] unless the form is open,
    /// [`CheckoutError::MissingCardNumber`] when the card number is blank,
    /// [`CheckoutError::EmptyCart`] when the cart was emptied meanwhile.
    pub fn begin_processing(&mut self, card: &CardDetails) -> Result<(), CheckoutError> {
        if self.phase != CheckoutPhase::PaymentOpen {
            return Err(CheckoutError::InvalidPhase {
                action: "pay",
                phase: self.phase,
            });
        }
        if card.card_number.trim().is_empty() {
            return Err(CheckoutError::MissingCardNumber);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.phase = CheckoutPhase::Processing;
        Ok(())
    }

    /// Turn every cart line into a pending purchase, put the new orders at
    /// the front of `orders` and empty the cart.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::InvalidPhase`] unless processing has begun.
    pub fn complete_payment<R: Rng + ?Sized>(
        &mut self,
        orders: &mut OrderBook,
        rng: &mut R,
        now: NaiveDateTime,
    ) -> Result<Vec<Order>, CheckoutError> {
        if self.phase != CheckoutPhase::Processing {
            return Err(CheckoutError::InvalidPhase {
                action: "complete payment",
                phase: self.phase,
            });
        }

        let placed: Vec<Order> = self
            .cart
            .items()
            .iter()
            .map(|line| purchase_order(&line.listing, rng, now))
            .collect();

        orders.prepend(placed.clone());
        self.cart.clear();
        self.phase = CheckoutPhase::Success;

        Ok(placed)
    }

    /// Leave the success screen.
    pub fn acknowledge_success(&mut self) {
        if self.phase == CheckoutPhase::Success {
            self.phase = CheckoutPhase::Browsing;
            self.sync_phase();
        }
    }
}

/// Build a fresh pending purchase for one cart listing.
fn purchase_order<R: Rng + ?Sized>(listing: &Listing, rng: &mut R, now: NaiveDateTime) -> Order {
    let counterparty = if listing.owner.trim().is_empty() {
        DEFAULT_COUNTERPARTY.to_owned()
    } else {
        listing.owner.clone()
    };
    let price = if listing.price.is_empty() {
        "$0 CAD".to_owned()
    } else {
        listing.price.clone()
    };

    Order {
        id: OrderId::generate(rng),
        item_id: listing.id.clone(),
        item_name: listing.name.clone(),
        item_image: listing.image_url.clone(),
        price,
        date: now.format("%b %-d, %Y").to_string(),
        status: OrderStatus::Pending,
        order_type: OrderType::Purchase,
        counterparty,
        shipping_address: DEFAULT_SHIPPING_ADDRESS.to_owned(),
        tracking_number: TrackingNumber::generate(rng),
        transit_history: vec![
            TransitEvent::done(
                "Order Placed",
                &now.format("%I:%M %p").to_string(),
                "User Checkout",
            ),
            TransitEvent::upcoming("Processing", "Partner Warehouse"),
            TransitEvent::upcoming("Shipped", PENDING_FIELD),
            TransitEvent::upcoming("In Transit", PENDING_FIELD),
            TransitEvent::upcoming("Delivered", PENDING_FIELD),
        ],
    }
}
