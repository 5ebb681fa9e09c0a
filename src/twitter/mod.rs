//! Twitter/X API integration module.
//!
//! This module contains the client that signs and sends tweet-creation
//! requests to the Twitter/X API v2 using OAuth 1.0a User Context
//! authentication.

mod api;
mod tweets;

// Re-export public API
pub use api::{SignedRequest, TwitterClient, TWEETS_ENDPOINT};
pub use tweets::{ReplySettings, TweetPayload};
