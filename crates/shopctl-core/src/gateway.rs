//! Resource gateway
//!
//! One shared HTTP client: fixed base URL, JSON defaults, and the opaque
//! session cookie attached to every request. On an authentication
//! failure the gateway does not navigate anywhere; it reports through
//! [`AuthState`] and lets the session store and route guard decide.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, CredentialCache};
use crate::error::{Error, Result};
use crate::models::{
    Category, CategoryDraft, CategoryStats, Product, ProductDraft, ProductStatsBundle, Review,
    ReviewPage, ReviewStats, ReviewStatus, Role, StatusCount,
};
use crate::categories::CategoryBackend;
use crate::products::ProductBackend;
use crate::reviews::{ReviewBackend, ReviewQuery};
use crate::session::{AuthBackend, AuthResponse, CheckResponse, LoginRequest, RegisterRequest};

/// Shared flag the gateway raises when the backend rejects the session.
///
/// The session store holds a clone and reconciles on its next read; no
/// network-layer component drives navigation directly.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    invalidated: Arc<AtomicBool>,
}

impl AuthState {
    pub fn report_invalidated(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }

    /// Read and clear the flag
    pub fn take_invalidated(&self) -> bool {
        self.invalidated.swap(false, Ordering::SeqCst)
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst)
    }
}

/// The shared backend client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    auth: AuthState,
    cookie: Arc<Mutex<Option<String>>>,
    cache: Option<CredentialCache>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            auth: AuthState::default(),
            cookie: Arc::new(Mutex::new(None)),
            cache: None,
        })
    }

    /// Attach a credential cache; any cookie it holds is loaded so the
    /// session survives across invocations.
    pub fn with_credential_cache(mut self, cache: CredentialCache) -> Self {
        *self.cookie.lock().unwrap() = cache.load();
        self.cache = Some(cache);
        self
    }

    /// Handle the session store and services share to observe 401s
    pub fn auth_state(&self) -> AuthState {
        self.auth.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn forget_credential(&self) {
        *self.cookie.lock().unwrap() = None;
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.clear() {
                log::warn!("failed to clear cached credential: {}", err);
            }
        }
    }

    fn remember_credential(&self, cookie: String) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.store(&cookie) {
                log::warn!("failed to persist credential: {}", err);
            }
        }
        *self.cookie.lock().unwrap() = Some(cookie);
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let cookie = self.cookie.lock().unwrap().clone();
        let request = match cookie {
            Some(value) => request.header(header::COOKIE, value),
            None => request,
        };

        let response = request.send().await?;

        if let Some(cookie) = extract_cookie(response.headers()) {
            self.remember_credential(cookie);
        }

        if response.status() == StatusCode::UNAUTHORIZED {
            log::warn!("backend rejected session credential ({})", response.url().path());
            self.auth.report_invalidated();
            self.forget_credential();
            return Err(Error::Unauthorized);
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("backend returned {}", status));

        if status == StatusCode::NOT_FOUND {
            Err(Error::not_found(message))
        } else {
            Err(Error::backend(message))
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        log::debug!("GET {}", path);
        let response = self.send(self.http.get(self.url(path)).query(query)).await?;
        self.decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("POST {}", path);
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        self.decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("PUT {}", path);
        let response = self.send(self.http.put(self.url(path)).json(body)).await?;
        self.decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("PATCH {}", path);
        let response = self.send(self.http.patch(self.url(path)).json(body)).await?;
        self.decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        log::debug!("DELETE {}", path);
        let response = self.send(self.http.delete(self.url(path))).await?;
        self.decode(response).await
    }
}

/// The backend issues one opaque session cookie; keep its name=value
/// pair and nothing else.
fn extract_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<String> = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(str::to_string)
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// `{success, message}` acknowledgment most mutating endpoints return
#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Ack {
    fn into_result(self, fallback: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::backend(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewListResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default, rename = "totalPages")]
    total_pages: i64,
    #[serde(default)]
    total: i64,
    #[serde(default)]
    stats: Vec<StatusCount>,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryStatsResponse {
    #[serde(default)]
    stats: CategoryStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductStatsResponse {
    #[serde(default)]
    stats: crate::models::ProductStats,
    #[serde(default)]
    category_stats: Vec<crate::models::CategoryCount>,
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    product: Product,
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn check(&self) -> Result<CheckResponse> {
        self.get("/auth/check", &[]).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.post("/auth/login", &LoginRequest { email, password }).await
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthResponse> {
        self.post(
            "/auth/register",
            &RegisterRequest { name, email, password, role },
        )
        .await
    }

    async fn logout(&self) -> Result<()> {
        let result: Result<serde_json::Value> = self.get("/auth/logout", &[]).await;
        // forget the credential whether or not the backend acknowledged
        self.forget_credential();
        result.map(|_| ())
    }
}

#[async_trait]
impl ReviewBackend for ApiClient {
    async fn list(&self, query: &ReviewQuery) -> Result<ReviewPage> {
        let response: ReviewListResponse =
            self.get("/reviews/admin/all", &query.to_params()).await?;
        if !response.success {
            return Err(Error::backend(
                response
                    .message
                    .unwrap_or_else(|| "Failed to fetch reviews".to_string()),
            ));
        }
        Ok(ReviewPage {
            reviews: response.reviews,
            total: response.total,
            total_pages: response.total_pages,
            stats: ReviewStats::from_counts(&response.stats),
        })
    }

    async fn counters(&self) -> Result<ReviewStats> {
        let response: ReviewListResponse = self.get("/reviews/admin/all", &[]).await?;
        Ok(ReviewStats::from_counts(&response.stats))
    }

    async fn set_status(&self, id: &str, status: ReviewStatus) -> Result<()> {
        let ack: Ack = self
            .patch(
                &format!("/reviews/{}/status", id),
                &serde_json::json!({ "status": status }),
            )
            .await?;
        ack.into_result("Failed to update review status")
    }

    async fn respond(&self, id: &str, message: &str) -> Result<()> {
        let ack: Ack = self
            .post(
                &format!("/reviews/{}/response", id),
                &serde_json::json!({ "message": message }),
            )
            .await?;
        ack.into_result("Failed to add response")
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let ack: Ack = ApiClient::delete(self, &format!("/reviews/{}", id)).await?;
        ack.into_result("Failed to delete review")
    }
}

#[async_trait]
impl CategoryBackend for ApiClient {
    async fn list(&self, limit: Option<i64>, level: Option<i64>) -> Result<Vec<Category>> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(level) = level {
            params.push(("level", level.to_string()));
        }
        let response: CategoriesResponse = self.get("/categories", &params).await?;
        Ok(response.categories)
    }

    async fn stats(&self) -> Result<CategoryStats> {
        let response: CategoryStatsResponse = self.get("/categories/admin/stats", &[]).await?;
        Ok(response.stats)
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<()> {
        let ack: Ack = self.post("/categories", draft).await?;
        ack.into_result("Failed to create category")
    }

    async fn update(&self, id: &str, draft: &CategoryDraft) -> Result<()> {
        let ack: Ack = self.put(&format!("/categories/{}", id), draft).await?;
        ack.into_result("Failed to update category")
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let ack: Ack = ApiClient::delete(self, &format!("/categories/{}", id)).await?;
        ack.into_result("Failed to delete category")
    }

    async fn toggle_status(&self, id: &str) -> Result<()> {
        let ack: Ack = self
            .patch(&format!("/categories/{}/toggle-status", id), &serde_json::json!({}))
            .await?;
        ack.into_result("Failed to toggle category status")
    }
}

#[async_trait]
impl ProductBackend for ApiClient {
    async fn stats(&self) -> Result<ProductStatsBundle> {
        let response: ProductStatsResponse = self.get("/products/admin/stats", &[]).await?;
        Ok(ProductStatsBundle {
            stats: response.stats,
            by_category: response.category_stats,
        })
    }

    async fn mine(&self, limit: Option<i64>, include_inactive: bool) -> Result<Vec<Product>> {
        let mut params = vec![("includeInactive", include_inactive.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        let response: ProductsResponse = self.get("/products/my/products", &params).await?;
        Ok(response.products)
    }

    async fn get(&self, id: &str) -> Result<Product> {
        let response: ProductResponse = self.get(&format!("/products/{}", id), &[]).await?;
        Ok(response.product)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<()> {
        let ack: Ack = self.post("/products", draft).await?;
        ack.into_result("Failed to create product")
    }

    async fn update(&self, id: &str, draft: &ProductDraft) -> Result<()> {
        let ack: Ack = self.put(&format!("/products/{}", id), draft).await?;
        ack.into_result("Failed to update product")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = ApiClient::new(&ApiConfig::new("https://api.example.com/api/")).unwrap();
        assert_eq!(client.url("/auth/check"), "https://api.example.com/api/auth/check");
    }

    #[test]
    fn test_auth_state_take_clears() {
        let state = AuthState::default();
        assert!(!state.take_invalidated());
        state.report_invalidated();
        assert!(state.is_invalidated());
        assert!(state.take_invalidated());
        assert!(!state.is_invalidated());
    }

    #[test]
    fn test_extract_cookie_keeps_pair_only() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("session=abc123; Path=/; HttpOnly; SameSite=Lax"),
        );
        assert_eq!(extract_cookie(&headers).as_deref(), Some("session=abc123"));
    }

    #[test]
    fn test_extract_cookie_none_without_header() {
        assert!(extract_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_ack_failure_uses_backend_message() {
        let ack: Ack = serde_json::from_str(r#"{"success":false,"message":"Review not found"}"#)
            .unwrap();
        let err = ack.into_result("fallback").unwrap_err();
        assert_eq!(err.to_string(), "Backend error: Review not found");
    }

    #[test]
    fn test_ack_defaults_to_success() {
        let ack: Ack = serde_json::from_str("{}").unwrap();
        assert!(ack.into_result("fallback").is_ok());
    }

    #[test]
    fn test_review_list_response_defaults() {
        let response: ReviewListResponse = serde_json::from_str(
            r#"{"success":true,"reviews":[],"totalPages":3,"total":23,
                "stats":[{"_id":"pending","count":23}]}"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(response.total_pages, 3);
        assert_eq!(ReviewStats::from_counts(&response.stats).pending, 23);
    }

    #[test]
    fn test_credential_cache_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let cache = crate::config::CredentialCache::at(dir.path().join("session"));
        cache.store("session=persisted").unwrap();

        let client = ApiClient::new(&ApiConfig::new("http://localhost:5000/api"))
            .unwrap()
            .with_credential_cache(cache);
        assert_eq!(client.cookie.lock().unwrap().as_deref(), Some("session=persisted"));

        client.forget_credential();
        assert!(client.cookie.lock().unwrap().is_none());
    }
}
