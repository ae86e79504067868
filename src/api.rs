use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::ApiError;
use crate::models::{ApiMessage, Contact, ContactInput, Credentials, LoginResponse, SignupRequest};

/// Stateless pass-through to the remote Contactly API. Holds no contact
/// cache; callers re-`list()` after every successful mutation to keep the
/// visible collection consistent.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Protected operations fail here, before any request is issued, when
    /// no token is held.
    fn bearer(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::Unauthorized)
    }

    // ── auth ──

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            let message = remote_message(response, "Invalid email or password!").await;
            error!("login rejected: {message}");
            return Err(ApiError::InvalidCredentials(message));
        }
        response.json().await.map_err(transport)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            let message = remote_message(response, "Signup failed!").await;
            error!("signup rejected: {message}");
            return Err(ApiError::SignupFailed(message));
        }
        let body: ApiMessage = response.json().await.map_err(transport)?;
        Ok(body
            .message
            .unwrap_or_else(|| "Signup Successful! Redirecting to login...".to_string()))
    }

    // ── contacts ──

    /// Fetch all contacts owned by the session's user, in server order.
    pub async fn list(&self) -> Result<Vec<Contact>, ApiError> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(self.url("/contacts"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        read_json(response, "Failed to fetch contacts").await
    }

    pub async fn create(&self, input: &ContactInput) -> Result<Contact, ApiError> {
        input.validate()?;
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.url("/contacts/create"))
            .bearer_auth(token)
            .json(input)
            .send()
            .await
            .map_err(transport)?;
        read_json(response, "Failed to save contact").await
    }

    pub async fn update(&self, id: &str, input: &ContactInput) -> Result<Contact, ApiError> {
        input.validate()?;
        let token = self.bearer()?;
        let response = self
            .http
            .put(self.url(&format!("/contacts/{id}")))
            .bearer_auth(token)
            .json(input)
            .send()
            .await
            .map_err(transport)?;
        read_json(response, "Failed to save contact").await
    }

    /// Idempotent from the caller's perspective: deleting an id the remote
    /// no longer has surfaces `NotFound`, never a crash.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let token = self.bearer()?;
        let response = self
            .http
            .delete(self.url(&format!("/contacts/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(status_error(response, "Failed to delete contact").await)
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    error!("request failed: {err}");
    ApiError::Http(err.to_string())
}

/// Pull the server-provided `message` out of an error body, falling back
/// to a static per-operation message.
async fn remote_message(response: reqwest::Response, fallback: &str) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiMessage>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| fallback.to_string())
}

async fn status_error(response: reqwest::Response, fallback: &str) -> ApiError {
    let status = response.status();
    let message = remote_message(response, fallback).await;
    error!("remote returned {status}: {message}");
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Http(message),
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(status_error(response, fallback).await);
    }
    response.json().await.map_err(transport)
}
