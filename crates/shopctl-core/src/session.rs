//! Session store
//!
//! The client's belief about the current user, reconciled against the
//! backend. One logical instance per running client, passed down
//! explicitly; only the store's own operations mutate it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gateway::AuthState;
use crate::models::{Role, UserSummary};

/// What the store currently believes.
///
/// `Unknown` is the initial loading state; it is retired by the first
/// `check()` and must never leak into a render decision (see `guard`).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Unknown,
    Authenticated(UserSummary),
    Anonymous,
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Unknown)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Payload of `GET /auth/check`
#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

/// Payload of `POST /auth/login` and `POST /auth/register`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /auth/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

/// Result value for login/register; expected failures are not errors
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl LoginOutcome {
    fn ok() -> Self {
        Self { success: true, message: None }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
}

/// The auth endpoints, seamed for testing
#[async_trait]
pub trait AuthBackend {
    async fn check(&self) -> Result<CheckResponse>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse>;
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthResponse>;
    async fn logout(&self) -> Result<()>;
}

/// Holds the current session and drives the auth operations.
pub struct SessionStore<B: AuthBackend> {
    backend: B,
    state: Session,
    auth_watch: AuthState,
}

impl<B: AuthBackend> SessionStore<B> {
    pub fn new(backend: B, auth_watch: AuthState) -> Self {
        Self {
            backend,
            state: Session::Unknown,
            auth_watch,
        }
    }

    /// Current state, reconciled with any 401 the gateway reported since
    /// the last read. Other components treat this as read-only context.
    pub fn session(&mut self) -> &Session {
        if self.auth_watch.take_invalidated() && self.state.is_authenticated() {
            log::warn!("session invalidated by backend, dropping user");
            self.state = Session::Anonymous;
        }
        &self.state
    }

    /// Validate the ambient credential against `/auth/check`.
    ///
    /// This is the only path that retires the initial loading state, and
    /// it does so on every outcome. Invoked once at process start;
    /// idempotent if invoked again.
    pub async fn check(&mut self) -> &Session {
        self.state = match self.backend.check().await {
            Ok(CheckResponse { authenticated: true, user: Some(user) }) => {
                Session::Authenticated(user)
            }
            Ok(_) => Session::Anonymous,
            Err(err) => {
                log::debug!("auth check failed: {}", err);
                Session::Anonymous
            }
        };
        // the check itself is the reconciliation
        self.auth_watch.take_invalidated();
        &self.state
    }

    /// Re-run the check after actions that might have invalidated the
    /// session.
    pub async fn refresh(&mut self) -> &Session {
        self.check().await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> LoginOutcome {
        match self.backend.login(email, password).await {
            Ok(AuthResponse { success: true, user: Some(user), .. }) => {
                self.state = Session::Authenticated(user);
                LoginOutcome::ok()
            }
            Ok(resp) => {
                LoginOutcome::fail(resp.message.unwrap_or_else(|| "Login failed".to_string()))
            }
            Err(Error::Backend(message)) => LoginOutcome::fail(message),
            Err(Error::Unauthorized) => LoginOutcome::fail("Invalid email or password"),
            Err(err) => LoginOutcome::fail(err.to_string()),
        }
    }

    /// Create an account; the role defaults to buyer when omitted.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> LoginOutcome {
        let role = role.unwrap_or(Role::Buyer);
        match self.backend.register(name, email, password, role).await {
            Ok(AuthResponse { success: true, user: Some(user), .. }) => {
                self.state = Session::Authenticated(user);
                LoginOutcome::ok()
            }
            Ok(resp) => LoginOutcome::fail(
                resp.message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            ),
            Err(Error::Backend(message)) => LoginOutcome::fail(message),
            Err(err) => LoginOutcome::fail(err.to_string()),
        }
    }

    /// Log out, fail-open: the local session is cleared even when the
    /// backend call fails.
    pub async fn logout(&mut self) -> &Session {
        if let Err(err) = self.backend.logout().await {
            log::warn!("logout request failed, clearing local session anyway: {}", err);
        }
        self.state = Session::Anonymous;
        &self.state
    }
}
