//! Marketplace listings: the demo catalogue, filtering and the "list an item"
//! draft with its validation rules.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, ListingId, ListingType, Price};

/// Colors offered when listing an item.
pub const COLOR_OPTIONS: [&str; 13] = [
    "Black",
    "White",
    "Blue",
    "Brown",
    "Grey",
    "Red",
    "Green",
    "Yellow",
    "Pink",
    "Purple",
    "Orange",
    "Multi-color",
    "Other",
];

/// Brands offered when listing an item.
pub const BRAND_OPTIONS: [&str; 11] = [
    "Levi's",
    "Zara",
    "Patagonia",
    "Uniqlo",
    "Nike",
    "Adidas",
    "H&M",
    "Arc'teryx",
    "Everlane",
    "Thrifted",
    "Other",
];

/// Styles offered when listing an item.
pub const STYLE_OPTIONS: [&str; 9] = [
    "Vintage",
    "Streetwear",
    "Minimalist",
    "Bohemian",
    "Sport",
    "Chic",
    "Grunge",
    "Y2K",
    "Formal",
];

/// Materials offered when listing an item.
pub const MATERIAL_OPTIONS: [&str; 10] = [
    "Organic Cotton",
    "Recycled Polyester",
    "Wool",
    "Linen",
    "Hemp",
    "Tencel",
    "Silk",
    "Leather",
    "Denim",
    "Other",
];

/// Highest price a listing may ask, and the upper bound of the price filter.
pub const MAX_LISTING_PRICE: u32 = 500;

/// Smallest gap the price filter keeps between its bounds.
pub const PRICE_FILTER_GAP: u32 = 10;

/// Photos kept per draft; extra uploads are dropped.
pub const MAX_PHOTOS: usize = 5;

/// Option value that unlocks a free-text field.
const OTHER: &str = "Other";

/// Choices the "list an item" form offers, plus its limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub categories: Vec<Category>,
    pub colors: &'static [&'static str],
    pub brands: &'static [&'static str],
    pub styles: &'static [&'static str],
    pub materials: &'static [&'static str],
    pub max_price: u32,
    pub max_photos: usize,
}

/// The form options, in display order.
#[must_use]
pub fn form_options() -> FormOptions {
    FormOptions {
        categories: Category::OPTIONS.to_vec(),
        colors: &COLOR_OPTIONS,
        brands: &BRAND_OPTIONS,
        styles: &STYLE_OPTIONS,
        materials: &MATERIAL_OPTIONS,
        max_price: MAX_LISTING_PRICE,
        max_photos: MAX_PHOTOS,
    }
}

/// A garment offered in the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub category: Category,
    pub fabric: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub image_url: String,
    /// Display price, e.g. `"$45 CAD"`.
    pub price: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price_num: Option<Decimal>,
    #[serde(rename = "type", default)]
    pub listing_type: ListingType,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repairs: u32,
}

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?q=80&w=400&h=400&auto=format&fit=crop")
}

/// One row of the demo catalogue.
struct DemoRow {
    id: &'static str,
    name: &'static str,
    price: u32,
    owner: &'static str,
    repairs: u32,
    photo: &'static str,
    color: &'static str,
    brand: &'static str,
    category: Category,
    style: &'static str,
    fabric: &'static str,
}

impl From<DemoRow> for Listing {
    fn from(row: DemoRow) -> Self {
        let amount = Decimal::from(row.price);
        Self {
            id: ListingId::from(row.id),
            name: row.name.to_owned(),
            category: row.category,
            fabric: row.fabric.to_owned(),
            color: row.color.to_owned(),
            brand: Some(row.brand.to_owned()),
            style: Some(row.style.to_owned()),
            image_url: unsplash(row.photo),
            price: Price::cad(amount).to_string(),
            price_num: Some(amount),
            listing_type: ListingType::Resell,
            owner: row.owner.to_owned(),
            repairs: row.repairs,
        }
    }
}

/// The fixed marketplace catalogue shown to every visitor.
#[must_use]
pub fn demo_listings() -> Vec<Listing> {
    #[rustfmt::skip]
    let rows = [
        DemoRow { id: "m1", name: "Vintage Levi's 501", price: 45, owner: "Elena", repairs: 1, photo: "1542272604-787c3835535d", color: "Blue", brand: "Levi's", category: Category::Bottom, style: "Vintage", fabric: "Denim" },
        DemoRow { id: "m2", name: "Linen Summer Dress", price: 60, owner: "Kai", repairs: 0, photo: "1595777457583-95e059d581b8", color: "Red", brand: "Zara", category: Category::Dress, style: "Bohemian", fabric: "Linen" },
        DemoRow { id: "m3", name: "Brown Utility Jacket", price: 120, owner: "Sarah", repairs: 2, photo: "1591047139829-d91aecb6caea", color: "Brown", brand: "Thrifted", category: Category::Outerwear, style: "Minimalist", fabric: "Wool" },
        DemoRow { id: "m4", name: "Technical Shell", price: 350, owner: "Marc", repairs: 0, photo: "1548883354-94bcfe321cbb", color: "Olive", brand: "Arc'teryx", category: Category::Outerwear, style: "Streetwear", fabric: "Recycled Polyester" },
        DemoRow { id: "m5", name: "Organic Cotton Tee", price: 25, owner: "Sacha", repairs: 0, photo: "1521572163474-6864f9cf17ab", color: "Black", brand: "Uniqlo", category: Category::Top, style: "Minimalist", fabric: "Organic Cotton" },
        DemoRow { id: "m6", name: "White Linen Midi", price: 85, owner: "Nadia", repairs: 0, photo: "1515372039744-b8f02a3ae446", color: "White", brand: "Everlane", category: Category::Dress, style: "Chic", fabric: "Linen" },
        DemoRow { id: "m7", name: "Better Sweater Fleece", price: 95, owner: "Jordan", repairs: 0, photo: "1551028719-00167b16eac5", color: "Grey", brand: "Patagonia", category: Category::Outerwear, style: "Sport", fabric: "Recycled Polyester" },
        DemoRow { id: "m8", name: "Leather Crossbody", price: 55, owner: "Mia", repairs: 1, photo: "1548036328-c9fa89d128fa", color: "Brown", brand: "Other", category: Category::Accessory, style: "Vintage", fabric: "Leather" },
        DemoRow { id: "m9", name: "Retro Air Force 1", price: 75, owner: "Leo", repairs: 0, photo: "1542291026-7eec264c27ff", color: "Red", brand: "Nike", category: Category::Footwear, style: "Streetwear", fabric: "Leather" },
        DemoRow { id: "m12", name: "Pink Silk Slip", price: 110, owner: "Eva", repairs: 0, photo: "1518831959646-742c3a14ebf7", color: "Pink", brand: "Zara", category: Category::Dress, style: "Chic", fabric: "Silk" },
        DemoRow { id: "m13", name: "Purple Thrifted Hoodie", price: 30, owner: "Sam", repairs: 2, photo: "1556821840-3a63f95609a7", color: "Purple", brand: "Thrifted", category: Category::Top, style: "Grunge", fabric: "Organic Cotton" },
        DemoRow { id: "m14", name: "Orange Utility Pants", price: 65, owner: "Finn", repairs: 0, photo: "1624378439575-d8705ad7ae80", color: "Orange", brand: "Adidas", category: Category::Bottom, style: "Streetwear", fabric: "Recycled Polyester" },
        DemoRow { id: "m15", name: "Multi-color Knit Scarf", price: 20, owner: "Lila", repairs: 0, photo: "1520903920243-00d872a2d1c9", color: "Multi-color", brand: "Other", category: Category::Accessory, style: "Bohemian", fabric: "Wool" },
        DemoRow { id: "m16", name: "Dark Grey Chinos", price: 50, owner: "Hugo", repairs: 0, photo: "1506629082955-511b1aa562c8", color: "Grey", brand: "Uniqlo", category: Category::Bottom, style: "Minimalist", fabric: "Organic Cotton" },
    ];

    rows.into_iter().map(Listing::from).collect()
}

/// Look up a listing by id in the demo catalogue and then in `extra`.
#[must_use]
pub fn find_listing(id: &ListingId, extra: &[Listing]) -> Option<Listing> {
    demo_listings()
        .into_iter()
        .chain(extra.iter().cloned())
        .find(|listing| &listing.id == id)
}

/// Marketplace filter. Empty text fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingFilter {
    pub color: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub style: Option<String>,
    pub min_price: Decimal,
    pub max_price: Decimal,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            color: None,
            category: None,
            brand: None,
            style: None,
            min_price: Decimal::ZERO,
            max_price: Decimal::from(MAX_LISTING_PRICE),
        }
    }
}

/// Exact, case-sensitive match against an optional filter value.
fn field_matches(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(wanted) => value == Some(wanted),
    }
}

impl ListingFilter {
    /// Whether a listing passes every active criterion.
    ///
    /// Listings without a numeric price skip the price range check.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        field_matches(self.color.as_deref(), Some(&listing.color))
            && field_matches(self.category.as_deref(), Some(listing.category.as_str()))
            && field_matches(self.brand.as_deref(), listing.brand.as_deref())
            && field_matches(self.style.as_deref(), listing.style.as_deref())
            && listing
                .price_num
                .is_none_or(|price| price >= self.min_price && price <= self.max_price)
    }

    /// Keep the listings that match, in their original order.
    #[must_use]
    pub fn apply<'a, I>(&self, listings: I) -> Vec<Listing>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect()
    }

    /// Move the lower price bound, keeping it at least the gap below the
    /// upper bound and never below zero.
    pub fn set_min_price(&mut self, value: Decimal) {
        let gap = Decimal::from(PRICE_FILTER_GAP);
        self.min_price = value.min(self.max_price - gap).max(Decimal::ZERO);
    }

    /// Move the upper price bound, keeping it at least the gap above the
    /// lower bound and never above the listing cap.
    pub fn set_max_price(&mut self, value: Decimal) {
        let gap = Decimal::from(PRICE_FILTER_GAP);
        self.max_price = value
            .max(self.min_price + gap)
            .min(Decimal::from(MAX_LISTING_PRICE));
    }
}

/// Free-text values used when a select field is set to "Other".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomFields {
    pub color: String,
    pub category: String,
    pub brand: String,
    pub fabric: String,
}

/// A seller's unpublished listing, exactly as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingDraft {
    pub name: String,
    pub category: String,
    pub fabric: String,
    pub color: String,
    pub style: String,
    pub brand: String,
    pub repairs: u32,
    pub price: String,
    pub images: Vec<String>,
    pub custom: CustomFields,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::Top.to_string(),
            fabric: String::new(),
            color: String::new(),
            style: String::new(),
            brand: String::new(),
            repairs: 0,
            price: String::new(),
            images: Vec::new(),
            custom: CustomFields::default(),
        }
    }
}

/// A rule a draft can break. `Display` gives the message shown to the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListingRule {
    NameRequired,
    ColorRequired,
    CustomColorRequired,
    MaterialRequired,
    CustomMaterialRequired,
    TypeRequired,
    CustomTypeRequired,
    CustomBrandRequired,
    InvalidPrice,
    PriceTooHigh,
    PhotoRequired,
}

impl fmt::Display for ListingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NameRequired => "Item Name is required.",
            Self::ColorRequired => "Color selection is required.",
            Self::CustomColorRequired => "Please specify the custom color.",
            Self::MaterialRequired => "Material selection is required.",
            Self::CustomMaterialRequired => "Please specify the custom material.",
            Self::TypeRequired => "Type selection is required.",
            Self::CustomTypeRequired => "Please specify the custom type.",
            Self::CustomBrandRequired => "Please specify the custom brand.",
            Self::InvalidPrice => "A valid price is required.",
            Self::PriceTooHigh => "Maximum price is $500 to keep it affordable.",
            Self::PhotoRequired => "At least one photo is required.",
        };
        f.write_str(message)
    }
}

/// Errors from publishing a listing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// The draft broke one or more rules; all of them are listed.
    #[error("listing draft is invalid ({} problems)", .0.len())]
    Invalid(Vec<ListingRule>),
}

impl ListingError {
    /// Seller-facing messages for every broken rule.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(rules) => rules.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Check a required select field and its "Other" free-text companion.
fn check_select(
    selected: &str,
    custom: &str,
    missing: ListingRule,
    missing_custom: ListingRule,
    broken: &mut Vec<ListingRule>,
) {
    if selected.is_empty() {
        broken.push(missing);
    } else if selected == OTHER && custom.trim().is_empty() {
        broken.push(missing_custom);
    }
}

/// The chosen option, or the custom text when "Other" was chosen.
fn resolve<'a>(selected: &'a str, custom: &'a str) -> &'a str {
    if selected == OTHER { custom } else { selected }
}

impl ListingDraft {
    /// Add a photo, keeping at most [`MAX_PHOTOS`].
    pub fn add_photo(&mut self, image: impl Into<String>) {
        if self.images.len() < MAX_PHOTOS {
            self.images.push(image.into());
        }
    }

    /// The asking price as a number, if the text is one.
    #[must_use]
    pub fn price_amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.price.trim()).ok()
    }

    /// Validate the draft, collecting every broken rule.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Invalid`] listing all broken rules.
    pub fn validate(&self) -> Result<Decimal, ListingError> {
        let mut broken = Vec::new();

        if self.name.trim().is_empty() {
            broken.push(ListingRule::NameRequired);
        }
        check_select(
            &self.color,
            &self.custom.color,
            ListingRule::ColorRequired,
            ListingRule::CustomColorRequired,
            &mut broken,
        );
        check_select(
            &self.fabric,
            &self.custom.fabric,
            ListingRule::MaterialRequired,
            ListingRule::CustomMaterialRequired,
            &mut broken,
        );
        check_select(
            &self.category,
            &self.custom.category,
            ListingRule::TypeRequired,
            ListingRule::CustomTypeRequired,
            &mut broken,
        );
        if self.brand == OTHER && self.custom.brand.trim().is_empty() {
            broken.push(ListingRule::CustomBrandRequired);
        }

        let price = self.price_amount();
        match price {
            Some(amount) if amount > Decimal::ZERO => {
                if amount > Decimal::from(MAX_LISTING_PRICE) {
                    broken.push(ListingRule::PriceTooHigh);
                }
            }
            _ => broken.push(ListingRule::InvalidPrice),
        }

        if self.images.is_empty() {
            broken.push(ListingRule::PhotoRequired);
        }

        match price {
            Some(amount) if broken.is_empty() => Ok(amount),
            _ => Err(ListingError::Invalid(broken)),
        }
    }

    /// Turn the draft into a live listing owned by `owner`.
    ///
    /// Brand falls back to "Local Loop" and style to "Modern" when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Invalid`] when validation fails.
    pub fn publish(&self, owner: &str, published_at_millis: i64) -> Result<Listing, ListingError> {
        let amount = self.validate()?;

        let brand = if self.brand.is_empty() {
            "Local Loop"
        } else {
            resolve(&self.brand, &self.custom.brand)
        };
        let style = if self.style.is_empty() {
            "Modern"
        } else {
            &self.style
        };

        Ok(Listing {
            id: ListingId::for_user_listing(published_at_millis),
            name: self.name.clone(),
            category: Category::from(resolve(&self.category, &self.custom.category)),
            fabric: resolve(&self.fabric, &self.custom.fabric).to_owned(),
            color: resolve(&self.color, &self.custom.color).to_owned(),
            brand: Some(brand.to_owned()),
            style: Some(style.to_owned()),
            image_url: self.images.first().cloned().unwrap_or_default(),
            price: format!("${} CAD", self.price.trim()),
            price_num: Some(amount),
            listing_type: ListingType::Resell,
            owner: owner.to_owned(),
            repairs: self.repairs,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_form_options_cover_demo_catalogue() {
        let options = form_options();
        assert_eq!(options.categories.first(), Some(&Category::Top));
        assert_eq!(options.colors.last(), Some(&OTHER));

        for listing in demo_listings() {
            assert!(options.materials.contains(&listing.fabric.as_str()), "{}", listing.fabric);
            assert!(options.categories.contains(&listing.category), "{}", listing.category.as_str());
        }

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["maxPrice"], 500);
        assert_eq!(json["maxPhotos"], 5);
        assert_eq!(json["categories"][3], "Outerwear");
    }

    fn valid_draft() -> ListingDraft {
        ListingDraft {
            name: "Corduroy Jacket".to_owned(),
            category: "Outerwear".to_owned(),
            fabric: "Wool".to_owned(),
            color: "Brown".to_owned(),
            price: "80".to_owned(),
            images: vec!["data:image/jpeg;base64,AAAA".to_owned()],
            ..ListingDraft::default()
        }
    }

    #[test]
    fn test_demo_catalogue() {
        let listings = demo_listings();
        assert_eq!(listings.len(), 14);
        assert_eq!(listings[0].id.as_str(), "m1");
        assert_eq!(listings[0].price, "$45 CAD");
        assert_eq!(listings[0].price_num, Some(Decimal::from(45)));
        assert!(listings[0].image_url.contains("photo-1542272604-787c3835535d"));
        assert_eq!(listings[13].id.as_str(), "m16");
    }

    #[test]
    fn test_filter_category_is_exact() {
        let filter = ListingFilter {
            category: Some("Dress".to_owned()),
            ..ListingFilter::default()
        };
        let catalogue = demo_listings();
        let dresses = filter.apply(&catalogue);
        assert_eq!(dresses.len(), 3);
        assert!(dresses.iter().all(|l| l.category == Category::Dress));

        let lowercase = ListingFilter {
            category: Some("dress".to_owned()),
            ..ListingFilter::default()
        };
        assert!(lowercase.apply(&catalogue).is_empty());
    }

    #[test]
    fn test_filter_price_range_is_inclusive() {
        let filter = ListingFilter {
            min_price: Decimal::from(45),
            max_price: Decimal::from(60),
            ..ListingFilter::default()
        };
        let ids: Vec<_> = filter
            .apply(&demo_listings())
            .into_iter()
            .map(|l| l.id.to_string())
            .collect();
        assert_eq!(ids, ["m1", "m2", "m8", "m16"]);
    }

    #[test]
    fn test_filter_empty_values_match_all() {
        let filter = ListingFilter {
            color: Some(String::new()),
            ..ListingFilter::default()
        };
        assert_eq!(filter.apply(&demo_listings()).len(), 14);
    }

    #[test]
    fn test_filter_unpriced_listing_passes_range() {
        let mut listing = demo_listings().remove(3);
        listing.price_num = None;
        let filter = ListingFilter {
            max_price: Decimal::from(10),
            ..ListingFilter::default()
        };
        assert!(filter.matches(&listing));
    }

    #[test]
    fn test_price_slider_clamping() {
        let mut filter = ListingFilter::default();
        filter.set_max_price(Decimal::from(100));
        filter.set_min_price(Decimal::from(95));
        assert_eq!(filter.min_price, Decimal::from(90));

        filter.set_max_price(Decimal::from(50));
        assert_eq!(filter.max_price, Decimal::from(100));

        filter.set_max_price(Decimal::from(900));
        assert_eq!(filter.max_price, Decimal::from(500));

        filter.set_min_price(Decimal::from(-20));
        assert_eq!(filter.min_price, Decimal::ZERO);
    }

    #[test]
    fn test_validate_collects_every_rule() {
        let draft = ListingDraft {
            category: String::new(),
            brand: "Other".to_owned(),
            ..ListingDraft::default()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            ListingError::Invalid(vec![
                ListingRule::NameRequired,
                ListingRule::ColorRequired,
                ListingRule::MaterialRequired,
                ListingRule::TypeRequired,
                ListingRule::CustomBrandRequired,
                ListingRule::InvalidPrice,
                ListingRule::PhotoRequired,
            ])
        );
        assert_eq!(err.messages()[0], "Item Name is required.");
    }

    #[test]
    fn test_validate_custom_fields() {
        let draft = ListingDraft {
            color: "Other".to_owned(),
            fabric: "Other".to_owned(),
            category: "Other".to_owned(),
            ..valid_draft()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            ListingError::Invalid(vec![
                ListingRule::CustomColorRequired,
                ListingRule::CustomMaterialRequired,
                ListingRule::CustomTypeRequired,
            ])
        );
    }

    #[test]
    fn test_validate_price_rules() {
        let too_high = ListingDraft {
            price: "600".to_owned(),
            ..valid_draft()
        };
        assert_eq!(
            too_high.validate().unwrap_err(),
            ListingError::Invalid(vec![ListingRule::PriceTooHigh])
        );

        for bad in ["0", "-5", "abc", ""] {
            let draft = ListingDraft {
                price: bad.to_owned(),
                ..valid_draft()
            };
            assert_eq!(
                draft.validate().unwrap_err(),
                ListingError::Invalid(vec![ListingRule::InvalidPrice]),
                "price {bad:?}"
            );
        }

        let at_cap = ListingDraft {
            price: "500".to_owned(),
            ..valid_draft()
        };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn test_add_photo_caps_at_five() {
        let mut draft = ListingDraft::default();
        for i in 0..8 {
            draft.add_photo(format!("img-{i}"));
        }
        assert_eq!(draft.images.len(), MAX_PHOTOS);
        assert_eq!(draft.images[4], "img-4");
    }

    #[test]
    fn test_publish_defaults() {
        let listing = valid_draft().publish("Ada Lovelace", 1_700_000_000_000).unwrap();
        assert_eq!(listing.id.as_str(), "u-list-1700000000000");
        assert_eq!(listing.price, "$80 CAD");
        assert_eq!(listing.price_num, Some(Decimal::from(80)));
        assert_eq!(listing.brand.as_deref(), Some("Local Loop"));
        assert_eq!(listing.style.as_deref(), Some("Modern"));
        assert_eq!(listing.owner, "Ada Lovelace");
        assert_eq!(listing.image_url, "data:image/jpeg;base64,AAAA");
        assert_eq!(listing.listing_type, ListingType::Resell);
    }

    #[test]
    fn test_publish_uses_custom_values() {
        let draft = ListingDraft {
            category: "Other".to_owned(),
            brand: "Other".to_owned(),
            color: "Other".to_owned(),
            custom: CustomFields {
                color: "Teal".to_owned(),
                category: "Kimono".to_owned(),
                brand: "Studio Nomad".to_owned(),
                fabric: String::new(),
            },
            ..valid_draft()
        };
        let listing = draft.publish("Ada", 1).unwrap();
        assert_eq!(listing.color, "Teal");
        assert_eq!(listing.category, Category::Custom("Kimono".to_owned()));
        assert_eq!(listing.brand.as_deref(), Some("Studio Nomad"));
    }

    #[test]
    fn test_listing_json_shape() {
        let json = serde_json::to_value(&demo_listings()[0]).unwrap();
        assert_eq!(json["type"], "Resell");
        assert_eq!(json["imageUrl"].as_str().unwrap(), unsplash("1542272604-787c3835535d"));
        assert_eq!(json["priceNum"], 45.0);
    }
}
