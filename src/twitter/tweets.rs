//! Tweet operations for Twitter API.
//!
//! This module contains the tweet-creation payload and the functions for
//! posting and replying to tweets using the Twitter API v2.

use log::{debug, info};
use reqwest::Method;
use serde::Serialize;

use crate::config::PostRequest;
use crate::error::PostError;
use crate::oauth::RequestSigner;

use super::api::{SignedRequest, TwitterClient};

/// JSON body for `POST /2/tweets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetPayload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplySettings>,
}

/// The `reply` object of a tweet-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplySettings {
    pub in_reply_to_tweet_id: String,
}

impl From<&PostRequest> for TweetPayload {
    fn from(request: &PostRequest) -> Self {
        Self {
            text: request.text.clone(),
            reply: request.reply_to_id.as_ref().map(|id| ReplySettings {
                in_reply_to_tweet_id: id.clone(),
            }),
        }
    }
}

impl TwitterClient {
    /// Signs the request for `request` with fresh OAuth parameters.
    pub fn prepare(&self, request: &PostRequest) -> Result<SignedRequest, PostError> {
        let payload = TweetPayload::from(request);
        let params = RequestSigner::new(self.credentials()).params();
        debug!(
            "Prepared OAuth parameters with nonce length {} and timestamp {}",
            params.nonce.len(),
            params.timestamp
        );
        SignedRequest::build(
            self.credentials(),
            Method::POST,
            self.endpoint(),
            &payload,
            &params,
        )
    }

    /// Posts a tweet (or a reply, when `reply_to_id` is set) to Twitter/X.
    ///
    /// One attempt only: there is no retry, timeout override, or rate-limit handling.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The API response body on successful tweet posting
    /// - `Err(PostError)`: Non-2xx status or transport failure
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use xpost::{Credentials, PostRequest, TwitterClient};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let credentials = Credentials {
    ///         consumer_key: "consumer_key".into(),
    ///         consumer_secret: "consumer_secret".into(),
    ///         access_token: "access_token".into(),
    ///         access_token_secret: "access_token_secret".into(),
    ///         bearer_token: None,
    ///     };
    ///     let client = TwitterClient::new(credentials);
    ///     match client.post_tweet(&PostRequest::new("Hello from Rust!", None)).await {
    ///         Ok(response) => println!("Tweet posted: {}", response),
    ///         Err(e) => eprintln!("Failed to post tweet: {}", e),
    ///     }
    /// }
    /// ```
    pub async fn post_tweet(&self, request: &PostRequest) -> Result<String, PostError> {
        match &request.reply_to_id {
            Some(id) => info!(
                "Starting reply operation to tweet {} ({} characters)",
                id,
                request.text.chars().count()
            ),
            None => info!(
                "Starting tweet post operation ({} characters)",
                request.text.chars().count()
            ),
        }

        let signed = self.prepare(request)?;
        debug!("Request payload: {}", signed.body);

        let operation_name = if request.reply_to_id.is_some() {
            "reply_to_tweet"
        } else {
            "post_tweet"
        };
        self.send(signed, operation_name).await
    }

    /// Replies to an existing tweet.
    pub async fn reply_to_tweet(
        &self,
        text: &str,
        reply_to_tweet_id: &str,
    ) -> Result<String, PostError> {
        self.post_tweet(&PostRequest::new(text, Some(reply_to_tweet_id)))
            .await
    }
}
