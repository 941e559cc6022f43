//! Public product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;

use debandi_core::Slug;

use crate::error::Result;
use crate::models::product::Product;
use crate::state::AppState;

/// Listing page size.
const PAGE_SIZE: usize = 12;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

/// Query parameters for catalog search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Product listing with optional category/search filters and pagination.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>> {
    let mut products = match query.category.as_deref() {
        Some(category) if category != "all" => state.catalog().by_category(category)?,
        _ => state.catalog().list()?,
    };

    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let needle = search.to_lowercase();
        products.retain(|p| matches_needle(p, &needle));
    }

    let total = products.len();
    let pages = total.div_ceil(PAGE_SIZE);
    let page = query.page.unwrap_or(1).max(1) as usize;
    let page_items: Vec<Product> = products
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Ok(Json(json!({
        "products": page_items,
        "total": total,
        "pages": pages,
        "currentPage": page,
    })))
}

/// Catalog search endpoint; rejects queries under 2 characters.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>> {
    let products = state.catalog().search(&query.q)?;
    let total = products.len();

    Ok(Json(json!({ "products": products, "total": total })))
}

/// Product detail by slug.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let product = state.catalog().get_by_slug(&Slug::from_raw(slug))?;
    Ok(Json(json!({ "product": product })))
}

fn matches_needle(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product
            .brand
            .as_ref()
            .is_some_and(|b| b.to_lowercase().contains(needle))
}
