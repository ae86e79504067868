use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{SignupRequest, User};

/// Persisted session state. Token and user live in one file so logout
/// removes both in a single operation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionFile {
    #[serde(rename = "authToken")]
    pub auth_token: String,
    #[serde(rename = "loggedInUser")]
    pub logged_in_user: User,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file means no session; a corrupt one is discarded rather
    /// than treated as fatal.
    pub fn load(&self) -> Option<SessionFile> {
        let data = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(
                    "discarding corrupt session file {}: {err}",
                    self.path.display()
                );
                None
            }
        }
    }

    pub fn save(&self, session: &SessionFile) -> Result<()> {
        let data = serde_json::to_string_pretty(session)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, data).with_context(|| format!("write {}", tmp.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // The file holds a bearer credential; keep it owner-only.
            let _ = fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600));
        }
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    /// An already-absent file counts as cleared.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}

/// Owns the authenticated identity and bearer token. The lifecycle is
/// Unauthenticated -> Authenticating -> Authenticated -> Unauthenticated;
/// a failed login lands straight back in Unauthenticated, nothing in
/// between is ever persisted.
pub struct SessionManager {
    store: SessionStore,
    current: Option<SessionFile>,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Read the persisted session, if any, and mark it active.
    pub fn restore(&mut self) -> Option<&User> {
        self.current = self.store.load();
        self.current.as_ref().map(|s| &s.logged_in_user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.auth_token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub async fn login(
        &mut self,
        api: &mut ApiClient,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter both email and password.".to_string(),
            ));
        }
        let response = api.login(email, password).await?;
        let session = SessionFile {
            auth_token: response.token,
            logged_in_user: response.user,
        };
        if let Err(err) = self.store.save(&session) {
            return Err(ApiError::Http(format!("could not persist session: {err}")));
        }
        api.set_token(Some(session.auth_token.clone()));
        info!("logged in as {}", session.logged_in_user.email);
        let user = session.logged_in_user.clone();
        self.current = Some(session);
        Ok(user)
    }

    /// Field presence and password confirmation are checked locally; only
    /// a fully valid form reaches the remote.
    pub async fn signup(
        &self,
        api: &ApiClient,
        request: SignupRequest,
        confirm_password: &str,
    ) -> Result<String, ApiError> {
        if request.username.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(ApiError::Validation("Please fill all fields.".to_string()));
        }
        if request.password != confirm_password {
            return Err(ApiError::Validation("Passwords don't match!".to_string()));
        }
        api.signup(&request).await
    }

    /// Clears in-memory state first, then the persisted file; the clearing
    /// happens unconditionally even when the caller is still showing a
    /// confirmation notice or deferring navigation.
    pub fn logout(&mut self, api: &mut ApiClient) -> Result<()> {
        self.current = None;
        api.set_token(None);
        let result = self.store.clear();
        info!("session cleared");
        result
    }
}
