//! Product domain types.

use serde::{Deserialize, Serialize};

use debandi_core::{Price, ProductId, Slug};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    /// Unique URL slug, derived deterministically from the name.
    pub slug: Slug,
    pub description: String,
    pub price: Price,
    /// Pre-discount price. When present, always >= `price`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub category: String,
    pub image: String,
    pub thumbnail: String,
    pub rating: f32,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Free-form specification mapping (voltage, weight, ...).
    pub specs: serde_json::Map<String, serde_json::Value>,
}

/// Data for creating a new product.
///
/// The slug, thumbnail, rating, and specs are filled in by the product
/// service; new products start unrated with an empty spec sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    pub category: String,
    pub image: String,
    pub stock: u32,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Partial update for an existing product.
///
/// Absent fields keep their current value. A name change re-derives the slug.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub brand: Option<String>,
}
