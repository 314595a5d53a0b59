//! The adapter facade.
//!
//! [`ZohoAdapter`] is what a host framework calls. It checks the per-call
//! context, delegates to a [`ContactProvider`] and translates every provider
//! failure into a [`BridgeError`]:
//!
//! | operation        | failure                      | status |
//! |------------------|------------------------------|--------|
//! | any              | missing `apiKey` / `apiUrl`  | 400    |
//! | list             | anything                     | 401    |
//! | create/update/delete | anything                 | 500    |
//! | OAuth callback   | `error` parameter            | 500    |
//! | OAuth callback   | missing `code` / server      | 400    |
//! | OAuth callback   | code exchange failed         | 502    |

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use zohocrm_core::{ContactDraft, NormalizedContact};
use zohocrm_providers::{ContactProvider, Credential, UpsertTarget};

use crate::error::{BridgeError, BridgeResult};

/// The credential pair a host supplies with every call.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallContext {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
}

impl CallContext {
    /// Creates a context with both values set.
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_url: Some(api_url.into()),
        }
    }

    /// Returns the credential, or a bad request naming the missing part.
    ///
    /// Empty strings count as missing.
    pub fn credential(&self) -> BridgeResult<Credential> {
        let api_key = present(&self.api_key)
            .ok_or_else(|| BridgeError::bad_request("No server key provided"))?;
        let api_url = present(&self.api_url)
            .ok_or_else(|| BridgeError::bad_request("No server url provided"))?;
        Ok(Credential::new(api_key, api_url))
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Query parameters Zoho appends when redirecting back after consent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    #[serde(rename = "accounts-server")]
    pub accounts_server: Option<String>,
    pub error: Option<String>,
}

/// Credential handed back to the host after a successful OAuth callback.
///
/// `api_key` has the form `accessToken:refreshToken`; only the refresh token
/// is used by later calls.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAccount {
    pub api_key: String,
    pub api_url: String,
}

impl std::fmt::Debug for ConnectedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedAccount")
            .field("api_key", &"***")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Contact adapter backed by a [`ContactProvider`].
pub struct ZohoAdapter {
    provider: Box<dyn ContactProvider>,
}

impl ZohoAdapter {
    /// Creates an adapter over the given provider.
    pub fn new(provider: impl ContactProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Returns every contact of the account.
    ///
    /// Any provider failure is logged with the key redacted and reported as
    /// unauthorized.
    pub async fn get_contacts(&self, context: &CallContext) -> BridgeResult<Vec<NormalizedContact>> {
        let credential = context.credential()?;

        match self.provider.list_contacts(&credential).await {
            Ok(contacts) => {
                info!(count = contacts.len(), "listed contacts");
                Ok(contacts)
            }
            Err(e) => {
                error!(
                    key = %credential.redacted(),
                    provider = self.provider.name(),
                    error = %e,
                    "could not get contacts"
                );
                Err(BridgeError::Unauthorized)
            }
        }
    }

    /// Creates a contact and returns it as stored.
    pub async fn create_contact(
        &self,
        context: &CallContext,
        draft: ContactDraft,
    ) -> BridgeResult<NormalizedContact> {
        let credential = context.credential()?;

        self.provider
            .upsert_contact(&credential, draft, UpsertTarget::Create)
            .await
            .map_err(|e| {
                warn!(key = %credential.redacted(), error = %e, "could not create contact");
                BridgeError::from_provider("Could not create contact", e)
            })
    }

    /// Patches the contact with the given id and returns it as stored.
    pub async fn update_contact(
        &self,
        context: &CallContext,
        id: &str,
        draft: ContactDraft,
    ) -> BridgeResult<NormalizedContact> {
        let credential = context.credential()?;
        let id = required_id(id)?;

        self.provider
            .upsert_contact(&credential, draft, UpsertTarget::Update(id.to_string()))
            .await
            .map_err(|e| {
                warn!(key = %credential.redacted(), id, error = %e, "could not update contact");
                BridgeError::from_provider("Could not update contact", e)
            })
    }

    /// Deletes the contact with the given id.
    pub async fn delete_contact(&self, context: &CallContext, id: &str) -> BridgeResult<()> {
        let credential = context.credential()?;
        let id = required_id(id)?;

        self.provider
            .delete_contact(&credential, id)
            .await
            .map_err(|e| {
                warn!(key = %credential.redacted(), id, error = %e, "could not delete contact");
                BridgeError::from_provider("Could not delete contact", e)
            })
    }

    /// Returns the consent page URL users are redirected to.
    pub fn oauth2_redirect_url(&self) -> BridgeResult<String> {
        self.provider
            .authorization_url()
            .map_err(|e| BridgeError::from_provider("Could not build redirect url", e))
    }

    /// Completes the OAuth flow and returns the credential to store.
    pub async fn handle_oauth2_callback(
        &self,
        callback: &OAuthCallback,
    ) -> BridgeResult<ConnectedAccount> {
        if let Some(ref reason) = callback.error {
            warn!(reason = %reason, "user denied access");
            return Err(BridgeError::server("Access denied to Zoho CRM"));
        }

        let code = present(&callback.code)
            .ok_or_else(|| BridgeError::bad_request("No authorization code provided"))?;
        let accounts_server = present(&callback.accounts_server)
            .ok_or_else(|| BridgeError::bad_request("No accounts server provided"))?;

        let tokens = self
            .provider
            .exchange_code(code, accounts_server)
            .await
            .map_err(|e| {
                error!(accounts_server, error = %e, "code exchange failed");
                BridgeError::upstream("Could not exchange authorization code", e)
            })?;

        let credential = Credential::from_tokens(&tokens, accounts_server);
        info!(
            key = %credential.redacted(),
            accounts_server,
            api_domain = tokens.api_domain.as_deref().unwrap_or("unknown"),
            "connected account"
        );

        Ok(ConnectedAccount {
            api_key: credential.api_key().to_string(),
            api_url: credential.api_url().to_string(),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn required_id(id: &str) -> BridgeResult<&str> {
    if id.trim().is_empty() {
        return Err(BridgeError::bad_request("No contact id provided"));
    }
    Ok(id)
}
