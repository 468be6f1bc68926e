//! Data models for the shopctl client
//!
//! Wire shapes follow the backend's JSON (camelCase fields, `_id` keys);
//! enums carry their string forms for query parameters and display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role; determines which screens a user may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity the backend vouches for on `/auth/check`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// An image reference as the backend stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Moderation lifecycle state of a customer review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }

    /// Whether moderation may move a review from `self` to `to`.
    ///
    /// Decisions are reversible (approved and rejected swap freely);
    /// only the no-op transition is refused.
    pub fn can_transition(self, to: ReviewStatus) -> bool {
        match (self, to) {
            (ReviewStatus::Pending, ReviewStatus::Approved) => true,
            (ReviewStatus::Pending, ReviewStatus::Rejected) => true,
            (ReviewStatus::Approved, ReviewStatus::Rejected) => true,
            (ReviewStatus::Rejected, ReviewStatus::Approved) => true,
            // back to pending, or a no-op transition
            _ => false,
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The product a review refers to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// The buyer who wrote a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A seller's one-time reply attached to a review
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerResponse {
    pub message: String,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Customer review as listed on the moderation screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: String,
    pub product: ProductRef,
    pub user: ReviewerRef,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub status: ReviewStatus,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub helpful_count: i64,
    #[serde(default)]
    pub response: Option<SellerResponse>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// A response may be attached at most once; this only hides the
    /// affordance client-side, the backend stays the source of truth.
    pub fn can_respond(&self) -> bool {
        self.response.is_none()
    }
}

/// One `{_id, count}` pair from the backend's status aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(alias = "_id")]
    pub id: String,
    pub count: i64,
}

/// Global review counters, always unfiltered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub total: i64,
}

impl ReviewStats {
    /// Fold the backend's `stats[]` aggregation into fixed counters.
    /// Unknown status ids are ignored; total is the sum of the three.
    pub fn from_counts(counts: &[StatusCount]) -> Self {
        let mut stats = ReviewStats::default();
        for entry in counts {
            match entry.id.as_str() {
                "pending" => stats.pending = entry.count,
                "approved" => stats.approved = entry.count,
                "rejected" => stats.rejected = entry.count,
                _ => {}
            }
        }
        stats.total = stats.pending + stats.approved + stats.rejected;
        stats
    }
}

/// Sort keys accepted by the review listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    RatingHigh,
    RatingLow,
    Helpful,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::RatingHigh => "rating_high",
            SortOrder::RatingLow => "rating_low",
            SortOrder::Helpful => "helpful",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "newest" => Some(SortOrder::Newest),
            "oldest" => Some(SortOrder::Oldest),
            "rating_high" => Some(SortOrder::RatingHigh),
            "rating_low" => Some(SortOrder::RatingLow),
            "helpful" => Some(SortOrder::Helpful),
            _ => None,
        }
    }
}

/// One page of the filtered review listing plus its totals
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total: i64,
    pub total_pages: i64,
    pub stats: ReviewStats,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A populated parent-category reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<CategoryRef>,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn is_main(&self) -> bool {
        self.level == 0
    }
}

/// Fields submitted when creating or updating a category
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i64,
    pub is_featured: bool,
}

/// Admin category counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total: i64,
    pub active: i64,
    pub main_categories: i64,
    pub subcategories: i64,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Product as rendered by the dashboard and listing screens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields submitted when creating or updating a product
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub images: Vec<Image>,
    pub is_featured: bool,
}

/// Seller/admin product counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_products: i64,
    pub active_products: i64,
    pub average_price: f64,
    pub total_stock: i64,
    pub total_sold: i64,
}

/// Per-category product count for the dashboard breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(alias = "_id")]
    pub name: String,
    pub count: i64,
}

/// Product stats plus the per-category breakdown, fetched together
#[derive(Debug, Clone, Default)]
pub struct ProductStatsBundle {
    pub stats: ProductStats,
    pub by_category: Vec<CategoryCount>,
}
