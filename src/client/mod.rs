//! HTTP client for the notes API.
//!
//! Configuration is via environment variables:
//! - `NOTES_URL` - Base URL (default: `http://127.0.0.1:17020/api`)

mod cache;
mod store;

pub use cache::QueryCache;
pub use store::{NotesStore, NOTES_COLLECTION};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::ErrorResponse;
use crate::config::ClientConfig;
use crate::models::*;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// HTTP client for the notes API.
#[derive(Debug, Clone)]
pub struct NotesClient {
    base_url: String,
    client: Client,
}

impl NotesClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Create with an explicit base URL, e.g. `http://127.0.0.1:17020/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(error_from_response(status, response).await)
        }
    }

    /// Handle response that may return empty body (204 No Content).
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_response(status, response).await)
        }
    }

    // ============================================================
    // Note Operations
    // ============================================================

    pub async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        let response = self.request(reqwest::Method::GET, "/notes").send().await?;
        self.handle_response(response).await
    }

    pub async fn get_note(&self, id: i64) -> Result<Note, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/notes/{}", id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_note(&self, input: &NoteInput) -> Result<Note, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/notes")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn update_note(&self, id: i64, input: &NoteInput) -> Result<Note, ClientError> {
        let response = self
            .request(reqwest::Method::PATCH, &format!("/notes/{}", id))
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/notes/{}", id))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}

/// Prefer the `message` of a JSON error body; fall back to the raw text.
async fn error_from_response(status: StatusCode, response: reqwest::Response) -> ClientError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        _ => ClientError::Server(format!("{}: {}", status, message)),
    }
}
