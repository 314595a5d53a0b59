//! OAuth 2.0 flows against the Zoho accounts servers.
//!
//! Two grants are used:
//!
//! - `authorization_code`: once, when a user connects their account through
//!   the consent page. Yields the refresh token the host stores.
//! - `refresh_token`: at the start of every contact operation. Yields a
//!   short-lived access token and the API domain of the account.
//!
//! Zoho takes the grant parameters as query parameters on a POST to
//! `{accounts_server}/oauth/v2/token` and reports some failures as
//! `200 OK` with an `error` field, so the body is always inspected.

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::credential::{AccessGrant, Credential, TokenPair};
use crate::error::{ProviderError, ProviderResult};

use super::config::{OAuthCredentials, ZohoConfig};

/// Path of the token endpoint on an accounts server.
const TOKEN_PATH: &str = "/oauth/v2/token";

/// Path of the consent page on an accounts server.
const AUTH_PATH: &str = "/oauth/v2/auth";

/// OAuth client for the Zoho accounts servers.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    redirect_url: String,
    accounts_url: String,
    scope: String,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client sharing the given HTTP client.
    pub fn new(config: &ZohoConfig, http_client: reqwest::Client) -> Self {
        Self {
            credentials: config.credentials.clone(),
            redirect_url: config.redirect_url.clone(),
            accounts_url: config.accounts_url.clone(),
            scope: config.scope.clone(),
            http_client,
        }
    }

    /// Builds the consent page URL users are redirected to.
    pub fn redirect_url(&self) -> ProviderResult<String> {
        let base = format!("{}{}", self.accounts_url, AUTH_PATH);
        let url = Url::parse_with_params(
            &base,
            &[
                ("scope", self.scope.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("access_type", "offline"),
                ("redirect_uri", self.redirect_url.as_str()),
            ],
        )
        .map_err(|e| {
            ProviderError::configuration(format!("invalid accounts url: {}", e)).with_source(e)
        })?;

        Ok(url.into())
    }

    /// Exchanges the credential's refresh token for a fresh access grant.
    ///
    /// The credential is validated before any request is made.
    ///
    /// # Errors
    ///
    /// - `InvalidCredential` if the API key carries no refresh token
    /// - `AuthorizationFailed` if the token endpoint rejects the request or
    ///   answers without an access token or API domain
    /// - `TransportError` if the request could not be sent
    pub async fn authorize(&self, credential: &Credential) -> ProviderResult<AccessGrant> {
        let refresh_token = credential.refresh_token()?;

        let params = [
            ("refresh_token", refresh_token),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let (status, body) = self.post_token(credential.api_url(), &params).await?;

        if !status.is_success() {
            return Err(ProviderError::authorization(format!(
                "token refresh failed ({})",
                status
            ))
            .with_status(status.as_u16()));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::authorization(format!("invalid token response: {}", e)).with_source(e)
        })?;
        token.check("token refresh")?;

        match (token.access_token, token.api_domain) {
            (Some(access_token), Some(api_domain))
                if !access_token.is_empty() && !api_domain.is_empty() =>
            {
                debug!(api_domain = %api_domain, "refreshed access token");
                Ok(AccessGrant::new(access_token, api_domain))
            }
            _ => Err(ProviderError::authorization(
                "token response is missing access_token or api_domain",
            )),
        }
    }

    /// Exchanges an authorization code for the initial token pair.
    ///
    /// `accounts_server` is the per-account server Zoho reported in the
    /// callback, not the configured consent server.
    pub async fn exchange_code(&self, code: &str, accounts_server: &str) -> ProviderResult<TokenPair> {
        let params = [
            ("code", code),
            ("redirect_uri", self.redirect_url.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let (status, body) = self.post_token(accounts_server, &params).await?;

        if status != reqwest::StatusCode::OK {
            return Err(
                ProviderError::transport(format!("token exchange failed ({})", status))
                    .with_status(status.as_u16()),
            );
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::parse(format!("invalid token response: {}", e)).with_source(e)
        })?;
        token.check("token exchange")?;

        let (access_token, refresh_token) = match (token.access_token, token.refresh_token) {
            (Some(access), Some(refresh)) if !refresh.is_empty() => (access, refresh),
            _ => {
                return Err(ProviderError::authorization(
                    "token response is missing refresh_token",
                ));
            }
        };

        info!(accounts_server, "obtained tokens from authorization code");
        Ok(TokenPair {
            access_token,
            refresh_token,
            api_domain: token.api_domain,
            expires_in: token.expires_in,
        })
    }

    /// POSTs grant parameters to a token endpoint and returns status and body.
    async fn post_token(
        &self,
        server: &str,
        params: &[(&str, &str)],
    ) -> ProviderResult<(reqwest::StatusCode, String)> {
        let url = format!("{}{}", server.trim_end_matches('/'), TOKEN_PATH);

        let response = self.http_client.post(&url).query(params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Body of a token endpoint response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    api_domain: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    status: Option<String>,
    message: Option<String>,
}

impl TokenResponse {
    /// Fails if the body reports an error despite the status code.
    fn check(&self, what: &str) -> ProviderResult<()> {
        if let Some(ref error) = self.error {
            return Err(
                ProviderError::authorization(format!("{} rejected: {}", what, error))
                    .with_remote_code(error.clone()),
            );
        }
        if self.status.as_deref() == Some("error") {
            let message = self.message.as_deref().unwrap_or("unknown error");
            return Err(ProviderError::authorization(format!(
                "{} rejected: {}",
                what, message
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ProviderErrorCode;

    fn config(accounts_url: &str) -> ZohoConfig {
        ZohoConfig::new(
            OAuthCredentials::new("1000.CLIENT", "shh"),
            "https://bridge.example.com/oauth2/callback",
        )
        .with_accounts_url(accounts_url)
    }

    fn client(accounts_url: &str) -> OAuthClient {
        OAuthClient::new(&config(accounts_url), reqwest::Client::new())
    }

    #[test]
    fn consent_url() {
        let url = client(ZohoConfig::DEFAULT_ACCOUNTS_URL).redirect_url().unwrap();
        insta::assert_snapshot!(url, @"https://accounts.zoho.eu/oauth/v2/auth?scope=ZohoCRM.modules.contacts.ALL&client_id=1000.CLIENT&response_type=code&access_type=offline&redirect_uri=https%3A%2F%2Fbridge.example.com%2Foauth2%2Fcallback");
    }

    #[tokio::test]
    async fn authorize_exchanges_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .and(query_param("grant_type", "refresh_token"))
            .and(query_param("refresh_token", "1000.rt"))
            .and(query_param("client_id", "1000.CLIENT"))
            .and(query_param("client_secret", "shh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "1000.at",
                "api_domain": "https://www.zohoapis.eu",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = Credential::new("ignored:1000.rt", server.uri());
        let grant = client(&server.uri()).authorize(&credential).await.unwrap();

        assert_eq!(grant, AccessGrant::new("1000.at", "https://www.zohoapis.eu"));
    }

    #[tokio::test]
    async fn authorize_rejects_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"error": "invalid_code"})),
            )
            .mount(&server)
            .await;

        let credential = Credential::new("x:1000.rt", server.uri());
        let err = client(&server.uri()).authorize(&credential).await.unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
        assert_eq!(err.remote_code(), Some("invalid_code"));
    }

    #[tokio::test]
    async fn authorize_rejects_missing_api_domain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "1000.at"})),
            )
            .mount(&server)
            .await;

        let credential = Credential::new("x:1000.rt", server.uri());
        let err = client(&server.uri()).authorize(&credential).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
    }

    #[tokio::test]
    async fn authorize_rejects_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let credential = Credential::new("x:1000.rt", server.uri());
        let err = client(&server.uri()).authorize(&credential).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn malformed_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let credential = Credential::new("no-separator", server.uri());
        let err = client(&server.uri()).authorize(&credential).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidCredential);
    }

    #[tokio::test]
    async fn exchange_code_returns_token_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .and(query_param("grant_type", "authorization_code"))
            .and(query_param("code", "1000.code"))
            .and(query_param("redirect_uri", "https://bridge.example.com/oauth2/callback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "1000.at",
                "refresh_token": "1000.rt",
                "api_domain": "https://www.zohoapis.eu",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = client(ZohoConfig::DEFAULT_ACCOUNTS_URL)
            .exchange_code("1000.code", &server.uri())
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "1000.at");
        assert_eq!(tokens.refresh_token, "1000.rt");
        assert_eq!(tokens.api_domain.as_deref(), Some("https://www.zohoapis.eu"));
        assert_eq!(tokens.expires_in, Some(3600));
    }

    #[tokio::test]
    async fn exchange_code_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("code", "rejected"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(query_param("code", "no-refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "1000.at"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(query_param("code", "status-error"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"status": "error", "message": "code expired"}),
            ))
            .mount(&server)
            .await;

        let client = client(ZohoConfig::DEFAULT_ACCOUNTS_URL);

        let err = client.exchange_code("rejected", &server.uri()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::TransportError);
        assert_eq!(err.status(), Some(400));

        let err = client.exchange_code("no-refresh", &server.uri()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);

        let err = client.exchange_code("status-error", &server.uri()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
        assert!(err.message().contains("code expired"));
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_keeps_secrets_out_of_errors() {
        use std::error::Error as _;

        fn rendered(err: &ProviderError) -> String {
            let mut text = err.to_string();
            let mut source = err.source();
            while let Some(inner) = source {
                text.push_str(&format!(" | {}", inner));
                source = inner.source();
            }
            text
        }

        let client = client(ZohoConfig::DEFAULT_ACCOUNTS_URL);
        let credential = Credential::new("x:1000.REFRESHSECRET", "http://127.0.0.1:1");

        let err = client.authorize(&credential).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::TransportError);
        let text = rendered(&err);
        assert!(!text.contains("REFRESHSECRET"), "{}", text);
        assert!(!text.contains("client_secret"), "{}", text);

        let err = client
            .exchange_code("1000.CODESECRET", "http://127.0.0.1:1")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::TransportError);
        let text = rendered(&err);
        assert!(!text.contains("CODESECRET"), "{}", text);
        assert!(!text.contains("shh"), "{}", text);
    }
}
