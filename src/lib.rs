//! # xpost Library
//!
//! A small library behind the `xpost` command-line tool. It publishes a single
//! post (or reply) to the Twitter/X API v2 using OAuth 1.0a User Context
//! authentication.
//!
//! ## Features
//!
//! - Credential resolution with legacy variable-name fallback
//! - OAuth 1.0a HMAC-SHA1 request signing
//! - Single-attempt posting with typed errors
//! - Structured logging
//!
//! ## Configuration
//!
//! The following environment variables are read by [`PostInputs::from_env`]:
//! - `CONSUMER_KEY` / `X_API_KEY`: OAuth consumer key
//! - `CONSUMER_SECRET` / `X_API_SECRET`: OAuth consumer secret
//! - `ACCESS_TOKEN` / `X_ACCESS_TOKEN`: OAuth access token
//! - `ACCESS_TOKEN_SECRET` / `X_ACCESS_TOKEN_SECRET`: OAuth access token secret
//! - `BEARER_TOKEN`: Optional; rejected when access credentials are missing
//! - `TEXT`: The post text
//! - `REPLY_TO`: Optional id of the post being replied to
//!
//! The new names win; the legacy `X_*` names are used when the new one is unset or empty.

pub mod config;
pub mod error;
pub mod oauth;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{resolve, Credentials, PostInputs, PostRequest};
pub use error::{ConfigError, PostError};
pub use oauth::{hmac_sha1_base64, OAuthParams, RequestSigner};
pub use twitter::{SignedRequest, TweetPayload, TwitterClient, TWEETS_ENDPOINT};

/// Resolves `inputs` and posts once to `endpoint`.
///
/// Nothing is sent when resolution fails.
///
/// # Returns
///
/// - `Ok(String)`: The API response body
/// - `Err(PostError)`: Configuration, HTTP or transport failure
pub async fn publish(inputs: &PostInputs, endpoint: &str) -> Result<String, PostError> {
    let (credentials, request) = resolve(inputs)?;
    let client = TwitterClient::with_endpoint(credentials, endpoint);
    client.post_tweet(&request).await
}

/// Posts once and prints the outcome, returning the process exit code.
///
/// Prints the success line to stdout or the failure line to stderr.
///
/// # Returns
///
/// - `0`: The post was published
/// - `1`: Configuration, HTTP or transport failure
pub async fn run(inputs: &PostInputs, endpoint: &str) -> u8 {
    match publish(inputs, endpoint).await {
        Ok(body) => {
            println!("{}", success_message(&body));
            0
        }
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            e.exit_code()
        }
    }
}

/// The line printed to stdout after a successful post.
pub fn success_message(body: &str) -> String {
    format!("Tweet posted successfully: {}", body)
}

/// The line printed to stderr for a failed run.
pub fn failure_message(error: &PostError) -> String {
    if error.is_config() {
        format!("Error: {}", error)
    } else {
        format!("Failed to post tweet: {}", error)
    }
}
