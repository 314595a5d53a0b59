//! Zoho CRM provider implementation.
//!
//! This module implements the [`ContactProvider`] trait for Zoho CRM.

use tracing::{debug, info};
use zohocrm_core::{ContactDraft, NormalizedContact};

use crate::credential::{Credential, TokenPair};
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, ContactProvider, UpsertTarget};

use super::client::ZohoContactsClient;
use super::config::ZohoConfig;
use super::mapper::to_provider;
use super::oauth::OAuthClient;

/// Zoho CRM contact provider.
///
/// Holds only the process-wide configuration. Each operation exchanges the
/// caller's refresh token for a fresh access grant, uses it for one batch of
/// requests and drops it.
#[derive(Debug)]
pub struct ZohoProvider {
    oauth_client: OAuthClient,
    http_client: reqwest::Client,
}

impl ZohoProvider {
    /// Creates a new Zoho provider with the given configuration.
    pub fn new(config: ZohoConfig) -> ProviderResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        let oauth_client = OAuthClient::new(&config, http_client.clone());

        Ok(Self {
            oauth_client,
            http_client,
        })
    }

    /// Authorizes the credential and returns a client bound to the new grant.
    async fn connect(&self, credential: &Credential) -> ProviderResult<ZohoContactsClient> {
        let grant = self.oauth_client.authorize(credential).await?;
        Ok(ZohoContactsClient::new(self.http_client.clone(), grant))
    }

    async fn list(&self, credential: &Credential) -> ProviderResult<Vec<NormalizedContact>> {
        let client = self.connect(credential).await?;
        client.list_all().await
    }

    async fn upsert(
        &self,
        credential: &Credential,
        draft: ContactDraft,
        target: UpsertTarget,
    ) -> ProviderResult<NormalizedContact> {
        let client = self.connect(credential).await?;
        let record = to_provider(&draft, target.existing_id());

        let id = match target {
            UpsertTarget::Create => client.create(&record).await?,
            UpsertTarget::Update(id) => {
                client.update(&record).await?;
                id
            }
        };

        debug!(id = %id, "reading contact back");
        client.get(&id).await
    }

    async fn delete(&self, credential: &Credential, id: &str) -> ProviderResult<()> {
        let client = self.connect(credential).await?;
        client.delete(id).await?;
        info!(id, "deleted contact");
        Ok(())
    }
}

impl ContactProvider for ZohoProvider {
    fn name(&self) -> &str {
        "zoho"
    }

    fn list_contacts<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<Vec<NormalizedContact>>> {
        Box::pin(self.list(credential))
    }

    fn upsert_contact<'a>(
        &'a self,
        credential: &'a Credential,
        draft: ContactDraft,
        target: UpsertTarget,
    ) -> BoxFuture<'a, ProviderResult<NormalizedContact>> {
        Box::pin(self.upsert(credential, draft, target))
    }

    fn delete_contact<'a>(
        &'a self,
        credential: &'a Credential,
        id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.delete(credential, id))
    }

    fn authorization_url(&self) -> ProviderResult<String> {
        self.oauth_client.redirect_url()
    }

    fn exchange_code<'a>(
        &'a self,
        code: &'a str,
        accounts_server: &'a str,
    ) -> BoxFuture<'a, ProviderResult<TokenPair>> {
        Box::pin(self.oauth_client.exchange_code(code, accounts_server))
    }
}
