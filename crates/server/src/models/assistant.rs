//! Structured answers produced by the styling assistant.

use serde::{Deserialize, Serialize};

use ecothread_core::ActionCategory;

/// One outfit combination built around a garment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylingTip {
    pub title: String,
    pub description: String,
    pub items: Vec<String>,
}

/// Short repair guide for a garment issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairGuide {
    pub guide_title: String,
    pub steps: Vec<String>,
    pub pro_tip: String,
    pub youtube_search_query: String,
}

/// DIY project that gives a garment a new life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcyclingProject {
    pub project_title: String,
    pub difficulty: String,
    pub time: String,
    pub description: String,
    pub materials: Vec<String>,
    pub steps: Vec<String>,
}

/// Whether a photo proves a circular-fashion action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofVerdict {
    pub valid: bool,
    pub reason: String,
}

/// A nearby repair, thrift or fabric shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairShop {
    pub title: String,
    pub uri: String,
    pub snippet: String,
}

/// Maps-grounded shop search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairShopResults {
    pub text: String,
    pub locations: Vec<RepairShop>,
}

/// Where to look for shops. A postal code wins over coordinates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopSearch {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub postal_code: Option<String>,
}

/// Photo plus the action it should prove.
#[derive(Debug, Clone, Deserialize)]
pub struct ProofSubmission {
    pub image: String,
    pub action: ActionCategory,
}
