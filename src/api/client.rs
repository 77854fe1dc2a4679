// src/api/client.rs
//! Pure HTTP client wrapper for the Ryver API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Ryver OData service. It handles authentication
//! and status checking without any knowledge of records or pagination.

use super::Transport;
use crate::error::AppError;
use crate::types::BasicCredentials;
use reqwest::{header, Client, Response};
use serde_json::Value;

/// A thin wrapper around reqwest Client for Ryver API requests.
#[derive(Clone)]
pub struct RyverHttpClient {
    client: Client,
}

impl RyverHttpClient {
    /// Creates a new HTTP client that authenticates every request.
    pub fn new(credentials: &BasicCredentials) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(credentials)?)
            .build()?;
        Ok(Self { client })
    }

    /// Creates the default headers for Ryver API requests.
    fn create_headers(credentials: &BasicCredentials) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth_value = header::HeaderValue::from_str(&credentials.authorization_header())
            .map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid credential format: {}", e))
            })?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl Transport for RyverHttpClient {
    async fn get_json(&self, url: &str) -> Result<Value, AppError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        extract_json(response).await
    }

    async fn post_json(&self, url: &str, body: Option<&Value>) -> Result<Value, AppError> {
        log::debug!("POST {}", url);
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        extract_json(response).await
    }
}

/// Checks the status and decodes the body.
///
/// Non-success statuses become [`AppError::RyverService`] carrying the
/// response text; the caller never sees a partial result.
async fn extract_json(response: Response) -> Result<Value, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    log::debug!("{} from {}", status, url);

    if !status.is_success() {
        return Err(AppError::from_status(status.as_u16(), url, text));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (from {})", e, url))
    })
}
