//! HTTP client for the LMS REST API
//!
//! Responses arrive either wrapped in an envelope `{ "data": ..., "message": ... }`
//! or bare. Failed responses are mapped to `PortError` by status code; the
//! envelope's `message` becomes the error message when present.

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use core_kernel::PortError;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{AuthSession, Session, SessionStore, SharedSession};

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extracts the payload of a response body
///
/// Objects carrying a `data` key are unwrapped; anything else is taken as the
/// payload itself.
pub fn unwrap_envelope<T: DeserializeOwned>(body: Value) -> Result<T, PortError> {
    let payload = match body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| PortError::transformation(e.to_string()))
}

/// Seconds from a `Retry-After` header; HTTP-date values are ignored
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Client for the LMS REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    session: SharedSession,
}

impl ApiClient {
    /// Creates a client sharing the given session
    pub fn new(config: &ClientConfig, session: SharedSession) -> Result<Self, ClientError> {
        let timeout = config.request_timeout();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match self.session.read().await.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn transport_error(&self, err: reqwest::Error, operation: &str) -> PortError {
        if err.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            PortError::Connection {
                message: format!("{} failed: {}", operation, err),
                source: Some(Box::new(err)),
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, response: Response, resource: &str) -> Result<T, PortError> {
        let status = response.status();
        let retry_after = retry_after_secs(&response);
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, resource))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message.or(b.error))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::warn!(status = status.as_u16(), resource, %message, "request rejected by backend");
            return Err(PortError::from_status(status.as_u16(), resource, message).with_retry_after(retry_after));
        }

        let value: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| PortError::transformation(e.to_string()))?
        };
        unwrap_envelope(value)
    }

    /// Sends an authorized GET and decodes the payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T, PortError> {
        tracing::debug!(path, "GET");
        let response = self
            .authorized(Method::GET, path)
            .await
            .send()
            .await
            .map_err(|e| self.transport_error(e, resource))?;
        self.read(response, resource).await
    }

    /// Sends an authorized POST with a JSON body and decodes the payload
    pub async fn post<B, T>(&self, path: &str, body: &B, resource: &str) -> Result<T, PortError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let response = self
            .authorized(Method::POST, path)
            .await
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e, resource))?;
        self.read(response, resource).await
    }

    /// Logs in, updates the shared session and persists it
    pub async fn login(&self, store: &SessionStore, credentials: &Credentials) -> Result<AuthSession, ClientError> {
        let auth: AuthSession = self.post("/auth/login", credentials, "login").await?;
        store.save(&Session::authenticated(auth.clone()))?;
        *self.session.write().await = Session::authenticated(auth.clone());

        tracing::info!(role = %auth.role, "logged in");
        Ok(auth)
    }

    /// Clears the shared session and its persisted copy
    pub async fn logout(&self, store: &SessionStore) -> Result<(), ClientError> {
        self.session.write().await.clear();
        store.clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}
