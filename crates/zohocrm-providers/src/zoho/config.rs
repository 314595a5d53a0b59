//! Zoho provider configuration.
//!
//! The three OAuth client settings are read once at start-up and injected
//! into [`ZohoProvider`](super::ZohoProvider); nothing downstream reads the
//! environment again.

use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// OAuth 2.0 client credentials registered in the Zoho API console.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Checks that both values are non-empty.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.trim().is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.trim().is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Configuration for the Zoho CRM provider.
#[derive(Debug, Clone)]
pub struct ZohoConfig {
    pub credentials: OAuthCredentials,

    /// Where Zoho redirects the user after consent.
    pub redirect_url: String,

    /// Accounts server hosting the consent page.
    ///
    /// Token exchanges go to the per-account server reported in the OAuth
    /// callback instead; this one is only used to build the redirect URL.
    pub accounts_url: String,

    /// OAuth scope requested on the consent page.
    pub scope: String,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl ZohoConfig {
    pub const ENV_CLIENT_ID: &'static str = "ZOHO_CLIENT_ID";
    pub const ENV_CLIENT_SECRET: &'static str = "ZOHO_CLIENT_SECRET";
    pub const ENV_REDIRECT_URL: &'static str = "ZOHO_REDIRECT_URL";
    /// Optional override for [`Self::accounts_url`].
    pub const ENV_ACCOUNTS_URL: &'static str = "ZOHO_ACCOUNTS_URL";

    pub const DEFAULT_ACCOUNTS_URL: &'static str = "https://accounts.zoho.eu";

    /// Full access to the contacts module.
    pub const DEFAULT_SCOPE: &'static str = "ZohoCRM.modules.contacts.ALL";

    /// Creates a configuration with default accounts server and scope.
    pub fn new(credentials: OAuthCredentials, redirect_url: impl Into<String>) -> Self {
        Self {
            credentials,
            redirect_url: redirect_url.into(),
            accounts_url: Self::DEFAULT_ACCOUNTS_URL.to_string(),
            scope: Self::DEFAULT_SCOPE.to_string(),
            user_agent: format!("zohocrm-bridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing or empty
    /// setting.
    pub fn from_env() -> ProviderResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str, what: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    ProviderError::configuration(format!("missing {} in environment ({})", what, key))
                })
        };

        let client_id = required(Self::ENV_CLIENT_ID, "client ID")?;
        let client_secret = required(Self::ENV_CLIENT_SECRET, "client secret")?;
        let redirect_url = required(Self::ENV_REDIRECT_URL, "redirect url")?;

        let mut config = Self::new(OAuthCredentials::new(client_id, client_secret), redirect_url);
        if let Some(accounts_url) = lookup(Self::ENV_ACCOUNTS_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_accounts_url(accounts_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the accounts server used for the consent page.
    pub fn with_accounts_url(mut self, url: impl Into<String>) -> Self {
        self.accounts_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        self.credentials
            .validate()
            .map_err(|e| ProviderError::configuration(format!("invalid credentials: {}", e)))?;

        Url::parse(&self.redirect_url).map_err(|e| {
            ProviderError::configuration(format!("invalid redirect url: {}", e)).with_source(e)
        })?;
        Url::parse(&self.accounts_url).map_err(|e| {
            ProviderError::configuration(format!("invalid accounts url: {}", e)).with_source(e)
        })?;

        if self.scope.trim().is_empty() {
            return Err(ProviderError::configuration("an OAuth scope is required"));
        }

        Ok(())
    }
}
