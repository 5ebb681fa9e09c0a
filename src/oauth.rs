//! OAuth 1.0a request signing for Twitter/X API integration.
//!
//! Posting on behalf of a user requires OAuth 1.0a User Context authentication:
//! every request carries an `Authorization: OAuth ...` header whose
//! `oauth_signature` is an HMAC-SHA1 over a canonical form of the request.
//!
//! The pieces are exposed individually so each step can be checked against
//! published test vectors:
//!
//! - [`percent_encode`]: RFC 3986 encoding used everywhere in OAuth 1.0a
//! - [`signature_base_string`]: method, URL and sorted parameters
//! - [`signing_key`]: consumer secret and token secret joined by `&`
//! - [`hmac_sha1_base64`]: the signature itself

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use log::debug;
use rand::Rng;
use sha1::Sha1;

use crate::config::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// The only signature method this crate produces.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// OAuth protocol version sent with every request.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LENGTH: usize = 32;

/// Percent-encodes a string per RFC 3986, as OAuth 1.0a requires.
///
/// Only the unreserved characters `A-Z a-z 0-9 - . _ ~` pass through; every
/// other byte becomes `%XX` with upper-case hex digits.
///
/// # Example
///
/// ```rust
/// use xpost::oauth::percent_encode;
///
/// assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
/// assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
/// ```
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Generates a random alphanumeric nonce for a single request.
pub fn generate_nonce() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..NONCE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Current Unix time in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// The protocol parameters that accompany a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParams {
    pub consumer_key: String,
    pub token: String,
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthParams {
    /// Creates parameters with a fresh nonce and the current timestamp.
    pub fn new(consumer_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_nonce_and_timestamp(consumer_key, token, generate_nonce(), current_timestamp())
    }

    /// Creates parameters with a caller-chosen nonce and timestamp.
    pub fn with_nonce_and_timestamp(
        consumer_key: impl Into<String>,
        token: impl Into<String>,
        nonce: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            token: token.into(),
            nonce: nonce.into(),
            timestamp,
        }
    }

    /// All `oauth_*` parameters except the signature.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", self.nonce.clone()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", self.timestamp.to_string()),
            ("oauth_token", self.token.clone()),
            ("oauth_version", OAUTH_VERSION.to_string()),
        ]
    }
}

/// Encodes, sorts and joins parameters into the OAuth parameter string.
fn normalize_parameters<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k.as_ref()), percent_encode(v.as_ref())))
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the OAuth 1.0a signature base string.
///
/// `params` must contain every parameter that takes part in the signature:
/// the `oauth_*` protocol parameters plus any query or form-encoded body
/// parameters. A JSON body never contributes.
///
/// # Format
///
/// ```text
/// METHOD&percent(url)&percent(k1=v1&k2=v2...)
/// ```
pub fn signature_base_string<K, V>(method: &str, url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&normalize_parameters(params))
    )
}

/// Builds the HMAC-SHA1 signing key from the consumer and token secrets.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

/// Returns `Base64(HMAC-SHA1(key, base_string))`.
///
/// # Example
///
/// ```rust
/// use xpost::oauth::hmac_sha1_base64;
///
/// let signature = hmac_sha1_base64("The quick brown fox jumps over the lazy dog", "key");
/// assert_eq!(signature, "3nybhbi3iqa8ino29wqQcBydtNk=");
/// ```
pub fn hmac_sha1_base64(base_string: &str, key: &str) -> String {
    // HMAC accepts keys of any length, so `new_from_slice` cannot fail here.
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Signs requests on behalf of one set of user credentials.
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer with the given credentials.
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Fresh protocol parameters for the next request.
    pub fn params(&self) -> OAuthParams {
        OAuthParams::new(&self.credentials.consumer_key, &self.credentials.access_token)
    }

    /// Computes `oauth_signature` for a request.
    ///
    /// `extra_params` are query or form parameters that take part in the
    /// signature; pass an empty slice for a JSON body.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        params: &OAuthParams,
        extra_params: &[(&str, &str)],
    ) -> String {
        let mut all: Vec<(String, String)> = params
            .pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        all.extend(
            extra_params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        let base_string = signature_base_string(method, url, &all);
        debug!("OAuth signature base string: {}", base_string);

        let key = signing_key(
            &self.credentials.consumer_secret,
            &self.credentials.access_token_secret,
        );
        hmac_sha1_base64(&base_string, &key)
    }

    /// Builds the full `Authorization` header value for a request.
    ///
    /// # Format
    ///
    /// ```text
    /// OAuth oauth_consumer_key="...", oauth_nonce="...", oauth_signature="...", ...
    /// ```
    ///
    /// Parameters are sorted by name and both names and values are percent-encoded.
    pub fn authorization_header(&self, method: &str, url: &str, params: &OAuthParams) -> String {
        let signature = self.sign(method, url, params, &[]);

        let mut header_params = params.pairs();
        header_params.push(("oauth_signature", signature));
        header_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        format!("OAuth {}", fields)
    }
}
