//! # shopctl-core
//!
//! Core client logic for shopctl - the seller/admin dashboard client.
//!
//! This crate provides:
//! - Backend connection and credential settings (`config` module)
//! - Wire data models (`models` module)
//! - The shared HTTP gateway (`gateway` module)
//! - The session store (`session` module)
//! - Route authorization decisions (`guard` module)
//! - Review moderation workflow (`reviews` module)
//! - Category and product services (`categories`, `products` modules)
//! - Unified error handling (`error` module)

pub mod categories;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod products;
pub mod reviews;
pub mod session;

// Re-exports for convenience
pub use config::{ApiConfig, CredentialCache, ENV_API_URL};
pub use error::{Error, Result};
pub use gateway::{ApiClient, AuthState};

// Re-export commonly used types from models
pub use models::{
    Category, CategoryDraft, CategoryStats, Product, ProductDraft, ProductStats,
    ProductStatsBundle, Review, ReviewPage, ReviewStats, ReviewStatus, Role, SortOrder,
    UserSummary,
};

// Re-export the session and workflow surface
pub use guard::{authorize, public_access, route_access, Access, PublicAccess, RouteRule};
pub use reviews::{ModerationDesk, ReviewQuery};
pub use session::{AuthBackend, LoginOutcome, Session, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_version_format() {
        let v = version();
        // Should be semver format: x.y.z
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in x.y.z format");
    }
}
