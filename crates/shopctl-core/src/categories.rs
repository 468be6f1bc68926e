//! Category management
//!
//! Thin service over the category endpoints with the form's pre-flight
//! validation, so a bad draft never reaches the wire.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Category, CategoryDraft, CategoryStats};

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// The category endpoints, seamed for testing
#[async_trait]
pub trait CategoryBackend {
    /// `GET /categories?limit&level`
    async fn list(&self, limit: Option<i64>, level: Option<i64>) -> Result<Vec<Category>>;
    /// `GET /categories/admin/stats`
    async fn stats(&self) -> Result<CategoryStats>;
    /// `POST /categories`
    async fn create(&self, draft: &CategoryDraft) -> Result<()>;
    /// `PUT /categories/:id`
    async fn update(&self, id: &str, draft: &CategoryDraft) -> Result<()>;
    /// `DELETE /categories/:id`
    async fn delete(&self, id: &str) -> Result<()>;
    /// `PATCH /categories/:id/toggle-status`
    async fn toggle_status(&self, id: &str) -> Result<()>;
}

/// Validate a draft the way the form does, before any network call.
pub fn validate_draft(draft: &CategoryDraft) -> Result<()> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Error::validation("Category name is required"));
    }
    if name.len() > NAME_MAX {
        return Err(Error::validation(format!(
            "Category name must be {} characters or less",
            NAME_MAX
        )));
    }
    if let Some(description) = &draft.description {
        if description.len() > DESCRIPTION_MAX {
            return Err(Error::validation(format!(
                "Description must be {} characters or less",
                DESCRIPTION_MAX
            )));
        }
    }
    Ok(())
}

pub async fn create_category<B: CategoryBackend>(backend: &B, draft: &CategoryDraft) -> Result<()> {
    validate_draft(draft)?;
    backend.create(draft).await
}

pub async fn update_category<B: CategoryBackend>(
    backend: &B,
    id: &str,
    draft: &CategoryDraft,
) -> Result<()> {
    validate_draft(draft)?;
    backend.update(id, draft).await
}

/// Main categories are the ones a subcategory may attach to
pub fn main_categories(categories: &[Category]) -> Vec<&Category> {
    categories.iter().filter(|c| c.is_main()).collect()
}
