//! # xpost
//!
//! Publishes a single post (or reply) to Twitter/X using OAuth 1.0a User
//! Context authentication. Intended to be run by a scheduler or CI workflow
//! that provides the content and credentials through environment variables.
//!
//! ## Environment Variables
//!
//! - `TEXT`: The post text (required)
//! - `REPLY_TO`: Id of the post to reply to (optional)
//! - `CONSUMER_KEY`, `CONSUMER_SECRET` (or legacy `X_API_KEY`, `X_API_SECRET`)
//! - `ACCESS_TOKEN`, `ACCESS_TOKEN_SECRET` (or legacy `X_ACCESS_TOKEN`, `X_ACCESS_TOKEN_SECRET`)
//! - `BEARER_TOKEN`: Optional, but never sufficient on its own
//! - `RUST_LOG`: Log filter for diagnostic output
//!
//! ## Exit Codes
//!
//! - `0`: The post was published
//! - `1`: Validation failure, non-2xx response, or transport error

use log::info;
use std::process::ExitCode;

use xpost::{run, PostInputs, TWEETS_ENDPOINT};

/// Main entry point for the xpost tool.
///
/// Initializes logging, optionally loads a `.env` file, reads the inputs from
/// the environment, and posts once. The exit code comes from [`xpost::run`].
///
/// # Example Usage
///
/// ```bash
/// TEXT="hello world" CONSUMER_KEY=... CONSUMER_SECRET=... \
///   ACCESS_TOKEN=... ACCESS_TOKEN_SECRET=... cargo run
///
/// # Run with debug logging
/// RUST_LOG=debug cargo run
/// ```
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize the logging system
    env_logger::init();

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    let inputs = PostInputs::from_env();

    ExitCode::from(run(&inputs, TWEETS_ENDPOINT).await)
}
