//! Review moderation workflow
//!
//! Drives a review through pending/approved/rejected, attaches the
//! one-time seller response, and keeps the filtered listing and the
//! global counters in step after every mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Review, ReviewPage, ReviewStats, ReviewStatus, SortOrder};

pub const PAGE_LIMIT: i64 = 10;

/// Filter and pagination state for the moderation listing.
///
/// Ephemeral, owned by the screen. Any filter change except the page
/// itself resets pagination to page 1, so a stale page number is never
/// sent against a new filter set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewQuery {
    pub status: Option<ReviewStatus>,
    pub rating: Option<u8>,
    pub sort: SortOrder,
    pub search: String,
    pub page: i64,
    pub limit: i64,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            status: None,
            rating: None,
            sort: SortOrder::Newest,
            search: String::new(),
            page: 1,
            limit: PAGE_LIMIT,
        }
    }
}

impl ReviewQuery {
    pub fn with_status(mut self, status: Option<ReviewStatus>) -> Self {
        self.status = status;
        self.page = 1;
        self
    }

    pub fn with_rating(mut self, rating: Option<u8>) -> Self {
        self.rating = rating;
        self.page = 1;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self.page = 1;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page.max(1);
        self
    }

    /// Query string parameters; empty filters are omitted, matching what
    /// the listing endpoint expects.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(rating) = self.rating {
            params.push(("rating", rating.to_string()));
        }
        if !self.search.trim().is_empty() {
            params.push(("search", self.search.trim().to_string()));
        }
        params
    }
}

/// The review endpoints, seamed for testing
#[async_trait]
pub trait ReviewBackend {
    /// `GET /reviews/admin/all` with filters
    async fn list(&self, query: &ReviewQuery) -> Result<ReviewPage>;
    /// Unfiltered global counters
    async fn counters(&self) -> Result<ReviewStats>;
    /// `PATCH /reviews/:id/status`
    async fn set_status(&self, id: &str, status: ReviewStatus) -> Result<()>;
    /// `POST /reviews/:id/response`
    async fn respond(&self, id: &str, message: &str) -> Result<()>;
    /// `DELETE /reviews/:id`
    async fn delete(&self, id: &str) -> Result<()>;
}

/// A mutation's refreshed aftermath: the current page and the counters
#[derive(Debug, Clone)]
pub struct Moderated {
    pub page: ReviewPage,
    pub stats: ReviewStats,
}

/// The moderation screen's state machine over a [`ReviewBackend`].
///
/// List fetches are stamped with a monotonically increasing token; a
/// response that resolves after a newer fetch started is discarded
/// (`Error::Superseded`), so the rendered view is always the latest
/// writer's.
pub struct ModerationDesk<B: ReviewBackend> {
    backend: B,
    query: Mutex<ReviewQuery>,
    latest: AtomicU64,
    view: Mutex<Option<ReviewPage>>,
}

impl<B: ReviewBackend> ModerationDesk<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            query: Mutex::new(ReviewQuery::default()),
            latest: AtomicU64::new(0),
            view: Mutex::new(None),
        }
    }

    pub fn query(&self) -> ReviewQuery {
        self.query.lock().unwrap().clone()
    }

    /// Replace the filter state. Filter edits go through
    /// [`ReviewQuery`]'s builders, which reset the page.
    pub fn set_query(&self, query: ReviewQuery) {
        *self.query.lock().unwrap() = query;
    }

    /// Fetch the page for the current filters. Only the latest request
    /// may update the view.
    pub async fn load(&self) -> Result<ReviewPage> {
        let query = self.query();
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let page = self.backend.list(&query).await?;
        if self.latest.load(Ordering::SeqCst) != token {
            log::debug!("discarding stale review listing (token {})", token);
            return Err(Error::Superseded);
        }
        *self.view.lock().unwrap() = Some(page.clone());
        Ok(page)
    }

    /// Global counters; independent of the filtered view.
    pub async fn counters(&self) -> Result<ReviewStats> {
        self.backend.counters().await
    }

    /// Move a review to `status`, then re-fetch the current page and the
    /// counters. Waits for the server ack; on failure the prior view is
    /// left untouched.
    pub async fn set_status(&self, id: &str, status: ReviewStatus) -> Result<Moderated> {
        if let Some(current) = self.cached_status(id) {
            if !current.can_transition(status) {
                return Err(Error::validation(format!(
                    "Cannot move review from {} to {}",
                    current, status
                )));
            }
        }
        self.backend.set_status(id, status).await?;
        self.refreshed().await
    }

    /// Attach the one-time seller response. Empty or whitespace-only
    /// messages are rejected locally, before any network call, as is a
    /// second response to the same review.
    pub async fn respond(&self, id: &str, message: &str) -> Result<ReviewPage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::validation("Please enter a response"));
        }
        if let Some(review) = self.cached_review(id) {
            if !review.can_respond() {
                return Err(Error::validation("A response was already added to this review"));
            }
        }
        self.backend.respond(id, message).await?;
        self.load().await
    }

    /// Delete a review; terminal from any state. Callers confirm with the
    /// user before invoking this.
    pub async fn delete(&self, id: &str) -> Result<Moderated> {
        self.backend.delete(id).await?;
        self.refreshed().await
    }

    async fn refreshed(&self) -> Result<Moderated> {
        let page = self.load().await?;
        let stats = self.backend.counters().await?;
        Ok(Moderated { page, stats })
    }

    fn cached_review(&self, id: &str) -> Option<Review> {
        self.view
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|page| page.reviews.iter().find(|r| r.id == id).cloned())
    }

    fn cached_status(&self, id: &str) -> Option<ReviewStatus> {
        self.cached_review(id).map(|r| r.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRef, ReviewerRef, SellerResponse};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn review(id: &str, status: ReviewStatus) -> Review {
        Review {
            id: id.into(),
            product: ProductRef { id: "p1".into(), name: "Mug".into(), thumbnail: None },
            user: ReviewerRef { id: "u1".into(), name: "Dana".into() },
            rating: 4,
            title: "Solid".into(),
            comment: "Does the job".into(),
            images: vec![],
            status,
            verified: false,
            helpful_count: 0,
            response: None,
            created_at: chrono::Utc::now(),
        }
    }

    // ========================================================================
    // Mock backend
    // ========================================================================

    #[derive(Default)]
    struct MockReviewBackend {
        reviews: Mutex<HashMap<String, Review>>,
        list_calls: Mutex<u64>,
        counter_calls: Mutex<u64>,
        respond_calls: Mutex<u64>,
        set_status_error: Option<String>,
        // first list call blocks until released, to stage a race
        gate: Option<Arc<Notify>>,
        gated_entered: Option<Arc<Notify>>,
    }

    impl MockReviewBackend {
        fn with_reviews(reviews: Vec<Review>) -> Self {
            Self {
                reviews: Mutex::new(reviews.into_iter().map(|r| (r.id.clone(), r)).collect()),
                ..Default::default()
            }
        }

        fn list_calls(&self) -> u64 {
            *self.list_calls.lock().unwrap()
        }

        fn counter_calls(&self) -> u64 {
            *self.counter_calls.lock().unwrap()
        }

        fn page(&self) -> ReviewPage {
            let reviews: Vec<Review> = self.reviews.lock().unwrap().values().cloned().collect();
            let total = reviews.len() as i64;
            ReviewPage {
                reviews,
                total,
                total_pages: crate::guard::total_pages(total, PAGE_LIMIT),
                stats: ReviewStats::default(),
            }
        }
    }

    #[async_trait]
    impl ReviewBackend for MockReviewBackend {
        async fn list(&self, _query: &ReviewQuery) -> Result<ReviewPage> {
            let call = {
                let mut calls = self.list_calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call == 1 {
                if let (Some(gate), Some(entered)) = (&self.gate, &self.gated_entered) {
                    entered.notify_one();
                    gate.notified().await;
                }
            }
            Ok(self.page())
        }

        async fn counters(&self) -> Result<ReviewStats> {
            *self.counter_calls.lock().unwrap() += 1;
            let reviews = self.reviews.lock().unwrap();
            let count = |s: ReviewStatus| reviews.values().filter(|r| r.status == s).count() as i64;
            let (pending, approved, rejected) = (
                count(ReviewStatus::Pending),
                count(ReviewStatus::Approved),
                count(ReviewStatus::Rejected),
            );
            Ok(ReviewStats {
                pending,
                approved,
                rejected,
                total: pending + approved + rejected,
            })
        }

        async fn set_status(&self, id: &str, status: ReviewStatus) -> Result<()> {
            if let Some(msg) = &self.set_status_error {
                return Err(Error::backend(msg.clone()));
            }
            let mut reviews = self.reviews.lock().unwrap();
            let review = reviews
                .get_mut(id)
                .ok_or_else(|| Error::not_found(format!("review {}", id)))?;
            review.status = status;
            Ok(())
        }

        async fn respond(&self, id: &str, message: &str) -> Result<()> {
            *self.respond_calls.lock().unwrap() += 1;
            let mut reviews = self.reviews.lock().unwrap();
            let review = reviews
                .get_mut(id)
                .ok_or_else(|| Error::not_found(format!("review {}", id)))?;
            review.response = Some(SellerResponse {
                message: message.to_string(),
                responded_at: Some(chrono::Utc::now()),
            });
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.reviews.lock().unwrap().remove(id);
            Ok(())
        }
    }

    // ========================================================================
    // Query page-reset semantics
    // ========================================================================

    #[test]
    fn test_filter_change_resets_page() {
        let base = ReviewQuery::default().with_page(4);
        assert_eq!(base.clone().with_status(Some(ReviewStatus::Approved)).page, 1);
        assert_eq!(base.clone().with_rating(Some(5)).page, 1);
        assert_eq!(base.clone().with_sort(SortOrder::Helpful).page, 1);
        assert_eq!(base.clone().with_search("mug").page, 1);
        assert_eq!(base.with_page(5).page, 5);
    }

    #[test]
    fn test_params_omit_empty_filters() {
        let params = ReviewQuery::default().to_params();
        assert!(params.iter().all(|(k, _)| *k != "status" && *k != "search"));

        let params = ReviewQuery::default()
            .with_status(Some(ReviewStatus::Pending))
            .with_search("  mug  ")
            .to_params();
        assert!(params.contains(&("status", "pending".to_string())));
        assert!(params.contains(&("search", "mug".to_string())));
        assert!(params.contains(&("page", "1".to_string())));
    }

    // ========================================================================
    // Moderation decisions
    // ========================================================================

    #[tokio::test]
    async fn test_status_round_trip_refreshes_counters_each_time() {
        let backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Pending)]);
        let desk = ModerationDesk::new(backend);
        desk.load().await.unwrap();

        desk.set_status("r1", ReviewStatus::Approved).await.unwrap();
        desk.set_status("r1", ReviewStatus::Rejected).await.unwrap();
        let out = desk.set_status("r1", ReviewStatus::Approved).await.unwrap();

        assert_eq!(out.page.reviews[0].status, ReviewStatus::Approved);
        assert_eq!(out.stats.approved, 1);
        assert_eq!(desk.backend.counter_calls(), 3);
        // initial load plus one per mutation
        assert_eq!(desk.backend.list_calls(), 4);
    }

    #[tokio::test]
    async fn test_same_state_transition_rejected_locally() {
        let backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Approved)]);
        let desk = ModerationDesk::new(backend);
        desk.load().await.unwrap();

        let err = desk.set_status("r1", ReviewStatus::Approved).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(desk.backend.counter_calls(), 0);
    }

    #[tokio::test]
    async fn test_set_status_failure_leaves_view_untouched() {
        let mut backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Pending)]);
        backend.set_status_error = Some("Review not found".to_string());
        let desk = ModerationDesk::new(backend);
        let before = desk.load().await.unwrap();

        let err = desk.set_status("r1", ReviewStatus::Approved).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));

        let cached = desk.view.lock().unwrap().clone().unwrap();
        assert_eq!(cached.reviews[0].status, before.reviews[0].status);
        assert_eq!(desk.backend.counter_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_refreshes_view_and_counters() {
        let backend = MockReviewBackend::with_reviews(vec![
            review("r1", ReviewStatus::Pending),
            review("r2", ReviewStatus::Approved),
        ]);
        let desk = ModerationDesk::new(backend);
        desk.load().await.unwrap();

        let out = desk.delete("r1").await.unwrap();
        assert_eq!(out.page.total, 1);
        assert_eq!(out.stats.total, 1);
        assert_eq!(desk.backend.counter_calls(), 1);
    }

    // ========================================================================
    // Responses
    // ========================================================================

    #[tokio::test]
    async fn test_blank_response_makes_no_network_call() {
        let backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Approved)]);
        let desk = ModerationDesk::new(backend);

        for message in ["", "   ", "\n\t "] {
            let err = desk.respond("r1", message).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert_eq!(*desk.backend.respond_calls.lock().unwrap(), 0);
        assert_eq!(desk.backend.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_second_response_rejected_locally() {
        let backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Approved)]);
        let desk = ModerationDesk::new(backend);
        desk.load().await.unwrap();

        desk.respond("r1", "Thanks for the feedback").await.unwrap();
        let err = desk.respond("r1", "One more thing").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(*desk.backend.respond_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_response_message_is_trimmed() {
        let backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Pending)]);
        let desk = ModerationDesk::new(backend);

        desk.respond("r1", "  appreciated!  ").await.unwrap();
        let stored = desk.backend.reviews.lock().unwrap()["r1"]
            .response
            .clone()
            .unwrap();
        assert_eq!(stored.message, "appreciated!");
    }

    // ========================================================================
    // Last writer wins
    // ========================================================================

    #[tokio::test]
    async fn test_stale_listing_is_discarded() {
        let gate = Arc::new(Notify::new());
        let entered = Arc::new(Notify::new());
        let mut backend = MockReviewBackend::with_reviews(vec![review("r1", ReviewStatus::Pending)]);
        backend.gate = Some(gate.clone());
        backend.gated_entered = Some(entered.clone());

        let desk = Arc::new(ModerationDesk::new(backend));

        let slow = {
            let desk = desk.clone();
            tokio::spawn(async move { desk.load().await })
        };
        // wait until the slow fetch is in flight, then race a newer one
        entered.notified().await;
        desk.set_query(desk.query().with_search("mug"));
        desk.load().await.unwrap();
        gate.notify_one();

        let stale = slow.await.unwrap();
        assert!(matches!(stale, Err(Error::Superseded)));

        // the retained view is the newer fetch's
        assert!(desk.view.lock().unwrap().is_some());
        assert_eq!(desk.backend.list_calls(), 2);
    }
}
