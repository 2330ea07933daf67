//! Process-wide authentication context.
//!
//! The surrounding pages read the current user and call login, register and
//! logout through one [`AuthContext`] installed at startup with [`init`]. The
//! chat core never depends on it.

mod http;

use std::sync::{Arc, LazyLock, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::User;

pub use http::{AuthResponse, HttpAuthBackend, LoginRequest, RegisterRequest};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

static CONTEXT: OnceLock<AuthContext> = OnceLock::new();

/// Failure of an auth operation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input was rejected before any network call.
    #[error("{0}")]
    InvalidInput(String),

    /// The backend refused the credentials or registration.
    #[error("{0}")]
    Rejected(String),

    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("auth context has not been initialised")]
    NotInitialised,
}

/// Backend that actually performs authentication.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError>;
    async fn logout(&self) -> Result<(), AuthError>;
    /// The user the backend currently recognises, if any.
    async fn me(&self) -> Result<Option<User>, AuthError>;
}

/// Current user plus the operations that change it.
pub struct AuthContext {
    backend: Arc<dyn AuthBackend>,
    current: RwLock<Option<User>>,
}

impl AuthContext {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            current: RwLock::new(None),
        }
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Validate the input, then sign in through the backend.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed email or empty password, otherwise
    /// whatever the backend reports.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = validate_email(email)?;
        require("password", password)?;

        let user = self.backend.login(email, password).await?;
        info!(email = %user.email, "signed in");
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    /// Validate the input, then create the account through the backend.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty name or password or a malformed email,
    /// otherwise whatever the backend reports.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = require("name", name)?;
        let email = validate_email(email)?;
        require("password", password)?;

        let user = self.backend.register(name, email, password).await?;
        info!(email = %user.email, "registered");
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    /// Re-read the current user from the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cached user is left unchanged.
    pub async fn refresh(&self) -> Result<Option<User>, AuthError> {
        let user = self.backend.me().await?;
        *self.current.write().await = user.clone();
        Ok(user)
    }

    /// Sign out. The local user is cleared even if the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns the backend error after clearing the local user.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = self.backend.logout().await;
        *self.current.write().await = None;
        if let Err(err) = &result {
            warn!(error = %err, "backend logout failed, cleared local session anyway");
        }
        result
    }
}

/// Install the process-wide context. Later calls return the first context.
pub fn init(backend: Arc<dyn AuthBackend>) -> &'static AuthContext {
    CONTEXT.get_or_init(|| AuthContext::new(backend))
}

/// The process-wide context installed by [`init`].
///
/// # Errors
///
/// `NotInitialised` if [`init`] has not been called.
pub fn context() -> Result<&'static AuthContext, AuthError> {
    CONTEXT.get().ok_or(AuthError::NotInitialised)
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}

/// Whether `email` looks like an address (`local@domain.tld`).
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn validate_email(email: &str) -> Result<&str, AuthError> {
    let email = require("email", email)?;
    if !is_valid_email(email) {
        return Err(AuthError::InvalidInput(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email)
}
