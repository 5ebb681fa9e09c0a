//! Error types for credential resolution and tweet posting.

use thiserror::Error;

/// Configuration problems detected before any network call is made.
///
/// Variants are listed in the order the resolver checks them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `TEXT` is missing or contains only whitespace.
    #[error("TEXT environment variable must be provided.")]
    MissingText,

    /// Neither the new nor the legacy consumer key/secret pair resolved.
    #[error("Missing consumer key/secret. Set CONSUMER_KEY and CONSUMER_SECRET (or legacy X_API_KEY/X_API_SECRET).")]
    MissingConsumerCredentials,

    /// A bearer token was supplied without user access credentials.
    #[error("Bearer tokens alone cannot post tweets. Please provide ACCESS_TOKEN and ACCESS_TOKEN_SECRET (or legacy X_ACCESS_TOKEN/X_ACCESS_TOKEN_SECRET) in addition to your bearer token.")]
    BearerTokenOnly,

    /// Neither the new nor the legacy access token/secret pair resolved.
    #[error("Missing access token/secret. Set ACCESS_TOKEN and ACCESS_TOKEN_SECRET (or legacy X_ACCESS_TOKEN/X_ACCESS_TOKEN_SECRET).")]
    MissingAccessCredentials,
}

/// Any failure that prevents a tweet from being posted.
#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to serialize tweet payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PostError {
    /// Process exit code for this failure. Every failure is terminal.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Whether the failure was caught before any request was sent.
    pub fn is_config(&self) -> bool {
        matches!(self, PostError::Config(_))
    }
}
