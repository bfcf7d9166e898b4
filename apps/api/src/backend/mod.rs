//! Typed client for the back-office REST backend.
//!
//! One async method per endpoint, one request per call: no retries, no
//! caching, no request coalescing. Pagination, filtering and status-transition
//! authority all live server-side; the transition tables on the status enums
//! only drive what the UI offers.
//!
//! This module is a library surface for the back-office UI layer: no route of
//! this service proxies the backend, so nothing outside the tests calls these
//! methods yet.
#![allow(dead_code)]

pub mod admin;
pub mod contracts;
pub mod cooptations;
pub mod invitations;
pub mod opportunities;
pub mod portal;
pub mod users;
pub mod vigilance;

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// HTTP status of an API rejection, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// An entry of a resource's status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange<S> {
    pub from_status: Option<S>,
    pub to_status: S,
    #[serde(default)]
    pub changed_by: Option<Uuid>,
    #[serde(default)]
    pub comment: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Body of every `PATCH .../status` call.
#[derive(Debug, Serialize)]
struct StatusUpdate<'a, S> {
    status: S,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Returns a client that sends `Authorization: Bearer <token>` on every call.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        execute(self.request(Method::GET, path)).await
    }

    async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        execute(self.request(Method::GET, path).query(query)).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        execute(self.request(Method::POST, path).json(body)).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        execute(self.request(Method::PUT, path).json(body)).await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        execute(self.request(Method::PATCH, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), BackendError> {
        send(self.request(Method::DELETE, path)).await.map(|_| ())
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let body = send(request).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn send(request: RequestBuilder) -> Result<String, BackendError> {
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        debug!("Backend rejected {url} with {status}");
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason()),
        });
    }

    debug!("Backend {url} -> {status} ({} bytes)", body.len());
    Ok(body)
}

/// Extracts a human-readable message from an error body.
/// Accepts `{"message": ..}`, `{"error": ..}` and `{"error": {"message": ..}}`.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .get("message")
            .or_else(|| value.get("error").and_then(|e| e.get("message")))
            .or_else(|| value.get("error"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("Unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}
