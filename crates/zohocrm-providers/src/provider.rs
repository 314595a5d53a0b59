//! ContactProvider trait definition.
//!
//! This module defines the [`ContactProvider`] trait, the seam between the
//! adapter facade and a concrete CRM backend.
//!
//! Providers are stateless with respect to callers: every operation receives
//! the caller's [`Credential`], authorizes from scratch, performs its HTTP
//! calls and returns. Nothing is cached between operations.

use std::future::Future;
use std::pin::Pin;

use zohocrm_core::{ContactDraft, NormalizedContact};

use crate::credential::{Credential, TokenPair};
use crate::error::ProviderResult;

/// A boxed future for trait methods.
///
/// Keeps the trait object-safe so the facade can hold a `dyn ContactProvider`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Whether an upsert creates a new record or patches an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertTarget {
    Create,
    /// Patch the record with this id.
    Update(String),
}

impl UpsertTarget {
    /// Returns the id being updated, if any.
    pub fn existing_id(&self) -> Option<&str> {
        match self {
            Self::Create => None,
            Self::Update(id) => Some(id),
        }
    }
}

/// The core abstraction for contact backends.
///
/// # Implementation Notes
///
/// - Each call authorizes independently; no token reuse across calls
/// - `list_contacts` must aggregate every page before returning
/// - Mutations must read the affected record back and fail if that fails
pub trait ContactProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "zoho").
    fn name(&self) -> &str;

    /// Fetches every contact visible to the credential.
    fn list_contacts<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProviderResult<Vec<NormalizedContact>>>;

    /// Creates or patches a contact and returns it as stored by the provider.
    fn upsert_contact<'a>(
        &'a self,
        credential: &'a Credential,
        draft: ContactDraft,
        target: UpsertTarget,
    ) -> BoxFuture<'a, ProviderResult<NormalizedContact>>;

    /// Deletes the contact with the given id.
    fn delete_contact<'a>(
        &'a self,
        credential: &'a Credential,
        id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;

    /// Returns the URL users are sent to in order to grant access.
    fn authorization_url(&self) -> ProviderResult<String>;

    /// Exchanges an authorization code for tokens at the given accounts server.
    fn exchange_code<'a>(
        &'a self,
        code: &'a str,
        accounts_server: &'a str,
    ) -> BoxFuture<'a, ProviderResult<TokenPair>>;
}
