//! Login session
//!
//! The backend issues a bearer token and a role at login. The session holding
//! them is an explicit value: it is persisted to a JSON file so a restart
//! keeps the user logged in, and it is handed to the API client at
//! construction instead of being looked up from ambient storage.
//!
//! Token expiry is read from the JWT `exp` claim. The signature is not
//! verified here; the backend does that on every request.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ClientError;

/// Session shared between the CLI and the API client
pub type SharedSession = Arc<RwLock<Session>>;

/// Token and role returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub role: String,
}

impl AuthSession {
    /// Expiry time from the token's `exp` claim, if the token carries one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        token_expiry(&self.token)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying its signature
///
/// Returns `None` for opaque tokens and tokens without `exp`.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let header = decode_header(token).ok()?;
    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp?, 0)
}

/// Current login state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<AuthSession>,
}

impl Session {
    /// A logged-out session
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(auth: AuthSession) -> Self {
        Self { auth: Some(auth) }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Bearer token, if logged in
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn role(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.role.as_str())
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn clear(&mut self) {
        self.auth = None;
    }
}

/// File-backed storage for the session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the persisted session
    ///
    /// A missing file or an expired token restores as logged out; an expired
    /// session file is removed.
    pub fn load(&self) -> Result<Session, ClientError> {
        self.load_at(Utc::now())
    }

    /// Restores the persisted session as of `now`
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Session, ClientError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Session::anonymous()),
            Err(err) => return Err(err.into()),
        };

        let auth: AuthSession = serde_json::from_str(&contents)?;
        if auth.is_expired_at(now) {
            tracing::info!(path = %self.path.display(), "stored session has expired");
            self.clear()?;
            return Ok(Session::anonymous());
        }

        tracing::debug!(role = %auth.role, "session restored");
        Ok(Session::authenticated(auth))
    }

    /// Persists a session; a logged-out session removes the file
    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        match session.auth() {
            Some(auth) => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&self.path, serde_json::to_vec_pretty(auth)?)?;
                Ok(())
            }
            None => self.clear(),
        }
    }

    /// Removes the session file if present
    pub fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_expiring_at(exp: i64) -> String {
        #[derive(Serialize)]
        struct Claims {
            sub: String,
            exp: i64,
        }
        encode(
            &Header::default(),
            &Claims {
                sub: "admin-1".to_string(),
                exp,
            },
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_expiry_is_read_without_the_secret() {
        let token = token_expiring_at(1_900_000_000);
        assert_eq!(token_expiry(&token).unwrap().timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let auth = AuthSession {
            token: "opaque-token".to_string(),
            role: "admin".to_string(),
        };
        assert!(auth.expires_at().is_none());
        assert!(!auth.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_session_accessors() {
        let mut session = Session::authenticated(AuthSession {
            token: "t".to_string(),
            role: "counsellor".to_string(),
        });
        assert_eq!(session.token(), Some("t"));
        assert_eq!(session.role(), Some("counsellor"));

        session.clear();
        assert!(!session.is_authenticated());
    }
}
