//! Core Twitter API utilities.
//!
//! This module contains the client type, the signed request representation,
//! and the single-attempt send used for every tweet operation.

use log::{debug, error, info};
use reqwest::{Client, Method};
use serde::Serialize;

use crate::config::Credentials;
use crate::error::PostError;
use crate::oauth::{OAuthParams, RequestSigner};

/// Twitter API v2 tweet-creation endpoint.
pub const TWEETS_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum length in bytes before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.len() > max_len {
        let mut cut = max_len;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... [truncated, {} total bytes]",
            &sanitized[..cut],
            text.len()
        )
    } else {
        sanitized
    }
}

/// A fully prepared request: signed headers plus the serialized JSON body.
///
/// Built deterministically from credentials, payload, nonce and timestamp,
/// so it can be inspected before anything is sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl SignedRequest {
    /// Serializes `payload` and signs a request for it.
    ///
    /// The JSON body is not part of the OAuth signature; only the protocol
    /// parameters in `params` are signed.
    pub fn build<T: Serialize>(
        credentials: &Credentials,
        method: Method,
        url: &str,
        payload: &T,
        params: &OAuthParams,
    ) -> Result<Self, PostError> {
        let body = serde_json::to_string(payload)?;
        let authorization =
            RequestSigner::new(credentials).authorization_header(method.as_str(), url, params);

        Ok(Self {
            url: url.to_string(),
            method,
            headers: vec![
                ("Authorization", authorization),
                ("Content-Type", "application/json".to_string()),
                ("Accept", "application/json".to_string()),
            ],
            body,
        })
    }

    /// Looks up a header value by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Client for posting to the Twitter/X API with OAuth 1.0a User Context credentials.
pub struct TwitterClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl TwitterClient {
    /// Creates a client targeting the public tweet-creation endpoint.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_endpoint(credentials, TWEETS_ENDPOINT)
    }

    /// Creates a client targeting a different endpoint URL.
    pub fn with_endpoint(credentials: Credentials, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            credentials,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sends a signed request once and returns the response body.
    ///
    /// The body is read as text whatever the status.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The response body for a 2xx status
    /// - `Err(PostError::Http)`: Non-2xx status, with the raw body
    /// - `Err(PostError::Transport)`: No response was received
    pub(crate) async fn send(
        &self,
        request: SignedRequest,
        operation_name: &str,
    ) -> Result<String, PostError> {
        info!(
            "Sending {} request to {} for operation: {}",
            request.method, request.url, operation_name
        );
        debug!(
            "Request headers: Authorization: OAuth [REDACTED], Content-Type: application/json, Accept: application/json"
        );

        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder.body(request.body).send().await.map_err(|e| {
            error!("Request for operation '{}' failed: {}", operation_name, e);
            PostError::Transport(e)
        })?;

        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        let body = response.text().await?;

        if status.is_success() {
            info!("Operation '{}' completed successfully", operation_name);
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                body.len()
            );
            Ok(body)
        } else {
            error!("Operation '{}' failed - Status: {}", operation_name, status);
            debug!(
                "Error response for '{}': {}",
                operation_name,
                sanitize_for_logging(&body, 200)
            );
            Err(PostError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}
