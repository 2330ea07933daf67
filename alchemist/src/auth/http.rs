//! Auth backend talking to the `/api/auth` endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AuthBackend, AuthError};
use crate::models::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Cookie-carrying HTTP client for the auth endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<AuthResponse, AuthError> {
        let url = format!("{}/api/auth/{path}", self.base_url);
        let resp = self.client.post(&url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let response: AuthResponse = resp.json().await?;
        if !response.success {
            return Err(AuthError::Rejected(response.message));
        }
        Ok(response)
    }

    fn expect_user(response: AuthResponse) -> Result<User, AuthError> {
        response
            .user
            .ok_or_else(|| AuthError::Rejected("auth response did not include a user".to_string()))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::expect_user(self.post("login", &body).await?)
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::expect_user(self.post("register", &body).await?)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.post("logout", &serde_json::json!({})).await.map(|_| ())
    }

    async fn me(&self) -> Result<Option<User>, AuthError> {
        let url = format!("{}/api/auth/me", self.base_url);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(Some(resp.json().await?))
    }
}
