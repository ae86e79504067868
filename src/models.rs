use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Account identity as issued by the remote system. The hosted API is
/// MongoDB-backed and serializes ids as `_id`; we accept both spellings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
}

/// A persisted contact record owned by one user. `id` is assigned by the
/// remote on creation and immutable thereafter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Contact {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub country: String,
}

/// The five editable fields sent on create and update.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub country: String,
}

impl ContactInput {
    /// All five fields are required non-empty; checked before any request
    /// is issued.
    pub fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            &self.name,
            &self.phone,
            &self.email,
            &self.city,
            &self.country,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ApiError::Validation(
                "Please fill in all fields before adding a contact.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Envelope the remote uses for signup results and error bodies.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: Option<String>,
}
