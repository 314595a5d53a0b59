//! Per-call credentials and the grants derived from them.
//!
//! A [`Credential`] is what the host hands over on every call: an API key of
//! the form `accessTokenPlaceholder:refreshToken` and the URL of the account's
//! OAuth server. Only the refresh token segment is ever used; it is exchanged
//! for an [`AccessGrant`] at the start of each operation.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{ProviderError, ProviderResult};

/// Number of hex characters kept from the SHA-256 fingerprint.
const FINGERPRINT_LEN: usize = 12;

/// Number of leading refresh-token characters kept in redacted output.
const VISIBLE_PREFIX_LEN: usize = 4;

/// The `{apiKey, apiUrl}` pair supplied with every call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    api_url: String,
}

impl Credential {
    /// Creates a credential from the raw API key and OAuth server URL.
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }

    /// Builds the credential handed back to the host after a code exchange.
    ///
    /// The API key carries the refresh token, not a usable access token.
    pub fn from_tokens(tokens: &TokenPair, accounts_server: impl Into<String>) -> Self {
        Self::new(
            format!("{}:{}", tokens.access_token, tokens.refresh_token),
            accounts_server,
        )
    }

    /// Returns the raw API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the account's OAuth server URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Extracts the refresh token from the API key.
    ///
    /// The key must split on `:` into exactly two segments and the second
    /// one must be non-empty.
    pub fn refresh_token(&self) -> ProviderResult<&str> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::invalid_credential("invalid API key"));
        }

        let (_, refresh_token) = self.api_key.split_once(':').ok_or_else(|| {
            ProviderError::invalid_credential("could not extract refresh token from API key")
        })?;

        if refresh_token.is_empty() || refresh_token.contains(':') {
            return Err(ProviderError::invalid_credential(
                "could not extract refresh token from API key",
            ));
        }

        Ok(refresh_token)
    }

    /// Returns a log-safe rendering of the API key.
    ///
    /// The access token placeholder is masked entirely; the refresh token
    /// keeps a short prefix and a fingerprint so lines for the same account
    /// can be correlated.
    pub fn redacted(&self) -> String {
        let fingerprint = fingerprint(&self.api_key);
        match self.api_key.split_once(':') {
            Some((_, refresh)) => {
                let prefix: String = refresh.chars().take(VISIBLE_PREFIX_LEN).collect();
                format!("***:{}…[{}]", prefix, fingerprint)
            }
            None => format!("[{}]", fingerprint),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &self.redacted())
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// A short-lived access token plus the resource host it is valid for.
///
/// Created at the start of an operation and dropped at its end.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub access_token: String,
    /// Resource host, e.g. `https://www.zohoapis.eu`.
    pub api_domain: String,
}

impl AccessGrant {
    /// Creates a new access grant.
    pub fn new(access_token: impl Into<String>, api_domain: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_domain: api_domain.into(),
        }
    }
}

impl fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGrant")
            .field("access_token", &"***")
            .field("api_domain", &self.api_domain)
            .finish()
    }
}

/// Tokens issued by an authorization-code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub api_domain: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<i64>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("api_domain", &self.api_domain)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
