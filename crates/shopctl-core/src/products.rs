//! Product management
//!
//! Listing, stats and the create/update path with the form's pre-flight
//! validation. Low-stock is a client-side derivation the dashboard shows.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Product, ProductDraft, ProductStatsBundle};

pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// The product endpoints, seamed for testing
#[async_trait]
pub trait ProductBackend {
    /// `GET /products/admin/stats`
    async fn stats(&self) -> Result<ProductStatsBundle>;
    /// `GET /products/my/products?limit&includeInactive`
    async fn mine(&self, limit: Option<i64>, include_inactive: bool) -> Result<Vec<Product>>;
    /// `GET /products/:id`
    async fn get(&self, id: &str) -> Result<Product>;
    /// `POST /products`
    async fn create(&self, draft: &ProductDraft) -> Result<()>;
    /// `PUT /products/:id`
    async fn update(&self, id: &str, draft: &ProductDraft) -> Result<()>;
}

/// Validate a draft the way the form does, before any network call.
pub fn validate_draft(draft: &ProductDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(Error::validation("Product name is required"));
    }
    if draft.description.trim().is_empty() {
        return Err(Error::validation("Product description is required"));
    }
    if draft.category.trim().is_empty() {
        return Err(Error::validation("Product category is required"));
    }
    if !(draft.price > 0.0) {
        return Err(Error::validation("Price must be greater than zero"));
    }
    if draft.stock < 0 {
        return Err(Error::validation("Stock cannot be negative"));
    }
    if let Some(discount) = draft.discount_price {
        if discount >= draft.price {
            return Err(Error::validation("Discount price must be below the price"));
        }
    }
    Ok(())
}

pub async fn create_product<B: ProductBackend>(backend: &B, draft: &ProductDraft) -> Result<()> {
    validate_draft(draft)?;
    backend.create(draft).await
}

pub async fn update_product<B: ProductBackend>(
    backend: &B,
    id: &str,
    draft: &ProductDraft,
) -> Result<()> {
    validate_draft(draft)?;
    backend.update(id, draft).await
}

/// Comma-separated tag input, trimmed, empties dropped
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Products the dashboard flags as running low
pub fn low_stock_count(products: &[Product]) -> usize {
    products.iter().filter(|p| p.stock < LOW_STOCK_THRESHOLD).count()
}
