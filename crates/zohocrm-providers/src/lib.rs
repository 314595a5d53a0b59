//! ContactProvider trait and the Zoho CRM implementation.
//!
//! This crate provides the abstraction layer for CRM contact backends:
//!
//! - [`ContactProvider`] - The trait the adapter facade talks to
//! - [`Credential`] - The per-call `{apiKey, apiUrl}` pair
//! - [`zoho::ZohoProvider`] - Zoho CRM over its v2 REST API
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Architecture
//!
//! ```text
//!   Credential ──► OAuthClient::authorize ──► AccessGrant
//!                                                 │
//!                                                 ▼
//!                                      ZohoContactsClient
//!                                                 │
//!                     ZohoResponse::decode ◄──────┤ HTTP
//!                                                 ▼
//!                     mapper::to_normalized ──► NormalizedContact
//! ```

pub mod credential;
pub mod error;
pub mod provider;
pub mod zoho;

pub use credential::{AccessGrant, Credential, TokenPair};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{BoxFuture, ContactProvider, UpsertTarget};
