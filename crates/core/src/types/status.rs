//! Status and classification enums shared across the marketplace.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

/// Which side of the trade the session's user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// The user sold the item.
    Sale,
    /// The user bought the item.
    Purchase,
}

/// How a listing is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListingType {
    #[default]
    Resell,
    Swap,
}

/// The three kinds of circular action a user can prove with a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    /// Repaired, upcycled or sewn something.
    Creator,
    /// Listed clothing for resale.
    Merchant,
    /// Donated or recycled textiles.
    Recycler,
}

/// Garment category.
///
/// Anything outside the fixed set is kept as [`Category::Custom`], which is
/// how a seller's "Other" plus free-text type ends up on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Top,
    Bottom,
    Outerwear,
    Dress,
    Accessory,
    Footwear,
    Other,
    Custom(String),
}

impl Category {
    /// The fixed categories, in the order the marketplace offers them.
    pub const OPTIONS: [Self; 7] = [
        Self::Top,
        Self::Bottom,
        Self::Dress,
        Self::Outerwear,
        Self::Accessory,
        Self::Footwear,
        Self::Other,
    ];

    /// The category label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
            Self::Outerwear => "Outerwear",
            Self::Dress => "Dress",
            Self::Accessory => "Accessory",
            Self::Footwear => "Footwear",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Top" => Self::Top,
            "Bottom" => Self::Bottom,
            "Outerwear" => Self::Outerwear,
            "Dress" => Self::Dress,
            "Accessory" => Self::Accessory,
            "Footwear" => Self::Footwear,
            "Other" => Self::Other,
            _ => Self::Custom(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(label) => label,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
