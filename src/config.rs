//! Configuration module for xpost.
//!
//! This module contains the raw input structure read from environment variables
//! and the resolution/validation logic that turns those inputs into the
//! credentials and post request used by the signer.

use log::{debug, error, info, warn};
use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Environment variable names read by [`PostInputs::from_env`].
pub mod vars {
    pub const CONSUMER_KEY: &str = "CONSUMER_KEY";
    pub const CONSUMER_SECRET: &str = "CONSUMER_SECRET";
    pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
    pub const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";
    pub const BEARER_TOKEN: &str = "BEARER_TOKEN";
    pub const LEGACY_API_KEY: &str = "X_API_KEY";
    pub const LEGACY_API_SECRET: &str = "X_API_SECRET";
    pub const LEGACY_ACCESS_TOKEN: &str = "X_ACCESS_TOKEN";
    pub const LEGACY_ACCESS_TOKEN_SECRET: &str = "X_ACCESS_TOKEN_SECRET";
    pub const TEXT: &str = "TEXT";
    pub const REPLY_TO: &str = "REPLY_TO";
}

/// Twitter's documented character limit for a single post.
const MAX_TWEET_CHARS: usize = 280;

/// Raw, unvalidated inputs for a single run.
///
/// Every field is optional here; [`resolve`] decides what is required.
/// Build it once at process start with [`PostInputs::from_env`], or from
/// any other source with [`PostInputs::from_lookup`].
#[derive(Default, Clone)]
pub struct PostInputs {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub bearer_token: Option<String>,
    pub legacy_api_key: Option<String>,
    pub legacy_api_secret: Option<String>,
    pub legacy_access_token: Option<String>,
    pub legacy_access_token_secret: Option<String>,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

impl PostInputs {
    /// Reads every known variable from the process environment.
    ///
    /// Variables that are unset or not valid unicode are treated as absent.
    pub fn from_env() -> Self {
        info!("Loading post configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds inputs from an arbitrary name -> value lookup.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use xpost::PostInputs;
    ///
    /// let vars: HashMap<&str, &str> = [("TEXT", "hello"), ("X_API_KEY", "key")].into();
    /// let inputs = PostInputs::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
    /// assert_eq!(inputs.text.as_deref(), Some("hello"));
    /// assert_eq!(inputs.legacy_api_key.as_deref(), Some("key"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            consumer_key: lookup(vars::CONSUMER_KEY),
            consumer_secret: lookup(vars::CONSUMER_SECRET),
            access_token: lookup(vars::ACCESS_TOKEN),
            access_token_secret: lookup(vars::ACCESS_TOKEN_SECRET),
            bearer_token: lookup(vars::BEARER_TOKEN),
            legacy_api_key: lookup(vars::LEGACY_API_KEY),
            legacy_api_secret: lookup(vars::LEGACY_API_SECRET),
            legacy_access_token: lookup(vars::LEGACY_ACCESS_TOKEN),
            legacy_access_token_secret: lookup(vars::LEGACY_ACCESS_TOKEN_SECRET),
            text: lookup(vars::TEXT),
            reply_to: lookup(vars::REPLY_TO),
        }
    }
}

impl fmt::Debug for PostInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = |v: &Option<String>| if v.is_some() { "[SET]" } else { "[UNSET]" };
        f.debug_struct("PostInputs")
            .field("consumer_key", &present(&self.consumer_key))
            .field("consumer_secret", &present(&self.consumer_secret))
            .field("access_token", &present(&self.access_token))
            .field("access_token_secret", &present(&self.access_token_secret))
            .field("bearer_token", &present(&self.bearer_token))
            .field("legacy_api_key", &present(&self.legacy_api_key))
            .field("legacy_api_secret", &present(&self.legacy_api_secret))
            .field("legacy_access_token", &present(&self.legacy_access_token))
            .field(
                "legacy_access_token_secret",
                &present(&self.legacy_access_token_secret),
            )
            .field("text", &self.text)
            .field("reply_to", &self.reply_to)
            .finish()
    }
}

/// OAuth 1.0a User Context credentials.
///
/// Secrets are redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    /// Kept for diagnostics only; a bearer token cannot authorize writes.
    pub bearer_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &mask_identifier(&self.consumer_key))
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &mask_identifier(&self.access_token))
            .field("access_token_secret", &"[REDACTED]")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// The content of a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    /// Sent exactly as provided; only checked for blankness.
    pub text: String,
    /// Trimmed id of the post being replied to.
    pub reply_to_id: Option<String>,
}

impl PostRequest {
    /// Creates a post request, dropping a blank reply id and trimming a present one.
    pub fn new(text: impl Into<String>, reply_to: Option<&str>) -> Self {
        let reply_to_id = reply_to
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self {
            text: text.into(),
            reply_to_id,
        }
    }
}

/// Masks a non-secret identifier (consumer key, access token) for logging.
///
/// Only values longer than 16 characters show a 4-character prefix; shorter
/// values are hidden entirely. Never pass secrets here.
pub(crate) fn mask_identifier(value: &str) -> String {
    let len = value.chars().count();
    if len > 16 {
        let prefix: String = value.chars().take(4).collect();
        format!("{}... ({} chars)", prefix, len)
    } else {
        format!("[REDACTED] ({} chars)", len)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Picks the new-style variable, falling back to the legacy one when the new
/// one is unset or empty.
fn pick<'a>(
    primary: &'a Option<String>,
    primary_name: &str,
    legacy: &'a Option<String>,
    legacy_name: &str,
) -> Option<&'a str> {
    if let Some(value) = non_empty(primary) {
        debug!("Using {}", primary_name);
        return Some(value);
    }
    if let Some(value) = non_empty(legacy) {
        info!("{} not set, falling back to legacy {}", primary_name, legacy_name);
        debug!("Using {}", legacy_name);
        return Some(value);
    }
    debug!("Neither {} nor {} is set", primary_name, legacy_name);
    None
}

/// Resolves and validates the inputs for one post.
///
/// Checks run in a fixed order and the first failure is returned:
///
/// 1. `TEXT` must be non-blank after trimming
/// 2. consumer key and secret must both resolve
/// 3. a bearer token without access credentials is rejected
/// 4. access token and secret must both resolve
///
/// # Returns
///
/// - `Ok((Credentials, PostRequest))`: Everything needed to sign and send
/// - `Err(ConfigError)`: The first failed check
pub fn resolve(inputs: &PostInputs) -> Result<(Credentials, PostRequest), ConfigError> {
    let text = match inputs.text.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            error!("TEXT is missing or blank");
            return Err(ConfigError::MissingText);
        }
    };

    let consumer_key = pick(
        &inputs.consumer_key,
        vars::CONSUMER_KEY,
        &inputs.legacy_api_key,
        vars::LEGACY_API_KEY,
    );
    let consumer_secret = pick(
        &inputs.consumer_secret,
        vars::CONSUMER_SECRET,
        &inputs.legacy_api_secret,
        vars::LEGACY_API_SECRET,
    );
    let (consumer_key, consumer_secret) = match (consumer_key, consumer_secret) {
        (Some(key), Some(secret)) => (key, secret),
        _ => {
            error!("Consumer key/secret could not be resolved");
            return Err(ConfigError::MissingConsumerCredentials);
        }
    };

    let access_token = pick(
        &inputs.access_token,
        vars::ACCESS_TOKEN,
        &inputs.legacy_access_token,
        vars::LEGACY_ACCESS_TOKEN,
    );
    let access_token_secret = pick(
        &inputs.access_token_secret,
        vars::ACCESS_TOKEN_SECRET,
        &inputs.legacy_access_token_secret,
        vars::LEGACY_ACCESS_TOKEN_SECRET,
    );
    let bearer_token = non_empty(&inputs.bearer_token);

    let (access_token, access_token_secret) = match (access_token, access_token_secret) {
        (Some(token), Some(secret)) => (token, secret),
        _ if bearer_token.is_some() => {
            error!("Only a bearer token was provided; it cannot authorize posting");
            return Err(ConfigError::BearerTokenOnly);
        }
        _ => {
            error!("Access token/secret could not be resolved");
            return Err(ConfigError::MissingAccessCredentials);
        }
    };

    if bearer_token.is_some() {
        debug!("BEARER_TOKEN is set but unused; posting uses OAuth 1.0a user context");
    }

    let char_count = text.chars().count();
    if char_count > MAX_TWEET_CHARS {
        warn!(
            "Tweet text is {} characters (limit {}); the API may reject it",
            char_count, MAX_TWEET_CHARS
        );
    }

    let credentials = Credentials {
        consumer_key: consumer_key.to_string(),
        consumer_secret: consumer_secret.to_string(),
        access_token: access_token.to_string(),
        access_token_secret: access_token_secret.to_string(),
        bearer_token: bearer_token.map(str::to_string),
    };
    let request = PostRequest::new(text, inputs.reply_to.as_deref());

    info!("Post configuration resolved successfully");
    debug!("Resolved credentials: {:?}", credentials);
    Ok((credentials, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn inputs(pairs: &[(&str, &str)]) -> PostInputs {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PostInputs::from_lookup(|name| map.get(name).cloned())
    }

    const FULL_NEW: &[(&str, &str)] = &[
        ("TEXT", "hello world"),
        ("CONSUMER_KEY", "ck"),
        ("CONSUMER_SECRET", "cs"),
        ("ACCESS_TOKEN", "at"),
        ("ACCESS_TOKEN_SECRET", "ats"),
    ];

    #[test]
    fn test_resolve_new_names() {
        let (creds, request) = resolve(&inputs(FULL_NEW)).unwrap();
        assert_eq!(creds.consumer_key, "ck");
        assert_eq!(creds.consumer_secret, "cs");
        assert_eq!(creds.access_token, "at");
        assert_eq!(creds.access_token_secret, "ats");
        assert_eq!(creds.bearer_token, None);
        assert_eq!(request, PostRequest::new("hello world", None));
    }

    #[test]
    fn test_legacy_fallback_for_each_pair() {
        let cases = [
            ("CONSUMER_KEY", "X_API_KEY"),
            ("CONSUMER_SECRET", "X_API_SECRET"),
            ("ACCESS_TOKEN", "X_ACCESS_TOKEN"),
            ("ACCESS_TOKEN_SECRET", "X_ACCESS_TOKEN_SECRET"),
        ];

        for (new_name, legacy_name) in cases {
            // Unset and empty both fall back.
            for new_value in [None, Some("")] {
                let mut pairs: Vec<(&str, &str)> = FULL_NEW
                    .iter()
                    .copied()
                    .filter(|(k, _)| *k != new_name)
                    .collect();
                if let Some(v) = new_value {
                    pairs.push((new_name, v));
                }
                pairs.push((legacy_name, "legacy-value"));

                let (creds, _) = resolve(&inputs(&pairs)).unwrap();
                let resolved = match new_name {
                    "CONSUMER_KEY" => &creds.consumer_key,
                    "CONSUMER_SECRET" => &creds.consumer_secret,
                    "ACCESS_TOKEN" => &creds.access_token,
                    _ => &creds.access_token_secret,
                };
                assert_eq!(resolved, "legacy-value", "fallback for {}", new_name);
            }
        }
    }

    #[test]
    fn test_new_name_takes_precedence_over_legacy() {
        let mut pairs = FULL_NEW.to_vec();
        pairs.push(("X_API_KEY", "legacy-key"));
        pairs.push(("X_ACCESS_TOKEN_SECRET", "legacy-secret"));
        let (creds, _) = resolve(&inputs(&pairs)).unwrap();
        assert_eq!(creds.consumer_key, "ck");
        assert_eq!(creds.access_token_secret, "ats");
    }

    #[test]
    fn test_only_legacy_names() {
        let pairs = [
            ("TEXT", "hi"),
            ("X_API_KEY", "k"),
            ("X_API_SECRET", "s"),
            ("X_ACCESS_TOKEN", "t"),
            ("X_ACCESS_TOKEN_SECRET", "ts"),
        ];
        let (creds, _) = resolve(&inputs(&pairs)).unwrap();
        assert_eq!(
            (
                creds.consumer_key.as_str(),
                creds.consumer_secret.as_str(),
                creds.access_token.as_str(),
                creds.access_token_secret.as_str()
            ),
            ("k", "s", "t", "ts")
        );
    }

    #[test]
    fn test_missing_or_blank_text() {
        let without_text: Vec<_> = FULL_NEW.iter().copied().skip(1).collect();
        assert_eq!(
            resolve(&inputs(&without_text)),
            Err(ConfigError::MissingText)
        );

        let mut blank = without_text.clone();
        blank.push(("TEXT", "   \n\t"));
        assert_eq!(resolve(&inputs(&blank)), Err(ConfigError::MissingText));
    }

    #[test]
    fn test_text_checked_before_credentials() {
        assert_eq!(resolve(&PostInputs::default()), Err(ConfigError::MissingText));
    }

    #[test]
    fn test_missing_consumer_credentials() {
        let pairs = [
            ("TEXT", "hi"),
            ("CONSUMER_KEY", ""),
            ("CONSUMER_SECRET", ""),
            ("ACCESS_TOKEN", "at"),
            ("ACCESS_TOKEN_SECRET", "ats"),
        ];
        assert_eq!(
            resolve(&inputs(&pairs)),
            Err(ConfigError::MissingConsumerCredentials)
        );

        let only_key = [("TEXT", "hi"), ("CONSUMER_KEY", "ck")];
        assert_eq!(
            resolve(&inputs(&only_key)),
            Err(ConfigError::MissingConsumerCredentials)
        );
    }

    #[test]
    fn test_consumer_checked_before_bearer() {
        let pairs = [("TEXT", "hi"), ("BEARER_TOKEN", "bt")];
        assert_eq!(
            resolve(&inputs(&pairs)),
            Err(ConfigError::MissingConsumerCredentials)
        );
    }

    #[test]
    fn test_bearer_token_without_access_credentials() {
        let pairs = [
            ("TEXT", "hi"),
            ("CONSUMER_KEY", "ck"),
            ("CONSUMER_SECRET", "cs"),
            ("BEARER_TOKEN", "bt"),
        ];
        let err = resolve(&inputs(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::BearerTokenOnly);
        assert!(err.to_string().contains("Bearer tokens alone cannot post tweets"));

        // A half-configured access pair is still rejected as bearer-only.
        let mut half = pairs.to_vec();
        half.push(("ACCESS_TOKEN", "at"));
        assert_eq!(resolve(&inputs(&half)), Err(ConfigError::BearerTokenOnly));
    }

    #[test]
    fn test_empty_bearer_token_is_ignored() {
        let pairs = [
            ("TEXT", "hi"),
            ("CONSUMER_KEY", "ck"),
            ("CONSUMER_SECRET", "cs"),
            ("BEARER_TOKEN", ""),
        ];
        assert_eq!(
            resolve(&inputs(&pairs)),
            Err(ConfigError::MissingAccessCredentials)
        );
    }

    #[test]
    fn test_bearer_token_alongside_access_credentials() {
        let mut pairs = FULL_NEW.to_vec();
        pairs.push(("BEARER_TOKEN", "bt"));
        let (creds, _) = resolve(&inputs(&pairs)).unwrap();
        assert_eq!(creds.bearer_token.as_deref(), Some("bt"));
    }

    #[test]
    fn test_missing_access_credentials() {
        let pairs = [
            ("TEXT", "hi"),
            ("CONSUMER_KEY", "ck"),
            ("CONSUMER_SECRET", "cs"),
            ("ACCESS_TOKEN", "at"),
        ];
        assert_eq!(
            resolve(&inputs(&pairs)),
            Err(ConfigError::MissingAccessCredentials)
        );
    }

    #[test]
    fn test_reply_to_is_trimmed_and_blank_dropped() {
        let mut pairs = FULL_NEW.to_vec();
        pairs.push(("REPLY_TO", "  12345 \n"));
        let (_, request) = resolve(&inputs(&pairs)).unwrap();
        assert_eq!(request.reply_to_id.as_deref(), Some("12345"));

        let mut blank = FULL_NEW.to_vec();
        blank.push(("REPLY_TO", "   "));
        let (_, request) = resolve(&inputs(&blank)).unwrap();
        assert_eq!(request.reply_to_id, None);
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let pairs = [
            ("TEXT", "  spaced out  "),
            ("CONSUMER_KEY", "ck"),
            ("CONSUMER_SECRET", "cs"),
            ("ACCESS_TOKEN", "at"),
            ("ACCESS_TOKEN_SECRET", "ats"),
        ];
        let (_, request) = resolve(&inputs(&pairs)).unwrap();
        assert_eq!(request.text, "  spaced out  ");
    }

    #[test]
    fn test_long_text_is_still_accepted() {
        let long = "a".repeat(MAX_TWEET_CHARS + 20);
        let mut pairs = FULL_NEW[1..].to_vec();
        pairs.push(("TEXT", long.as_str()));
        let (_, request) = resolve(&inputs(&pairs)).unwrap();
        assert_eq!(request.text.len(), MAX_TWEET_CHARS + 20);
    }

    #[test]
    fn test_mask_identifier_hides_short_values() {
        for value in ["s3cr3t", "k", "0123456789abcdef"] {
            let masked = mask_identifier(value);
            assert!(!masked.contains(value), "value shown in clear: {}", masked);
        }
        assert_eq!(mask_identifier("s3cr3t"), "[REDACTED] (6 chars)");
    }

    #[test]
    fn test_mask_identifier_long_values_keep_only_prefix() {
        let masked = mask_identifier("370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb");
        assert_eq!(masked, "3707... (50 chars)");
        assert!(!masked.contains("S9weJAEb"));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let (creds, _) = resolve(&inputs(&[
            ("TEXT", "hi"),
            ("CONSUMER_KEY", "k3y"),
            ("CONSUMER_SECRET", "super-secret-consumer"),
            ("ACCESS_TOKEN", "t0k"),
            ("ACCESS_TOKEN_SECRET", "super-secret-token"),
        ]))
        .unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret-consumer"));
        assert!(!debug.contains("super-secret-token"));
        assert!(!debug.contains("k3y"));
        assert!(!debug.contains("t0k"));
        assert!(debug.contains("[REDACTED]"));

        let raw = inputs(&[("CONSUMER_SECRET", "super-secret-consumer")]);
        assert!(!format!("{:?}", raw).contains("super-secret-consumer"));
    }
}
