//! Zoho CRM contact provider.
//!
//! This module provides a [`ZohoProvider`] that lists, creates, updates and
//! deletes records of the Zoho CRM Contacts module.
//!
//! # Authentication Flow
//!
//! 1. The host sends the user to [`OAuthClient::redirect_url`]
//! 2. Zoho redirects back with a `code` and the account's `accounts-server`
//! 3. The code is exchanged for an access/refresh token pair
//! 4. The host stores `access:refresh` as the API key and the accounts server
//!    as the API URL
//! 5. Every later operation trades the refresh token for a new access token
//!
//! # Example
//!
//! ```ignore
//! use zohocrm_providers::zoho::{ZohoConfig, ZohoProvider};
//! use zohocrm_providers::{ContactProvider, Credential};
//!
//! let provider = ZohoProvider::new(ZohoConfig::from_env()?)?;
//! let credential = Credential::new(api_key, api_url);
//! let contacts = provider.list_contacts(&credential).await?;
//! ```

mod client;
mod config;
pub mod mapper;
mod oauth;
mod provider;
pub mod record;

pub use client::ZohoContactsClient;
pub use config::{OAuthCredentials, ZohoConfig};
pub use mapper::{to_normalized, to_provider};
pub use oauth::OAuthClient;
pub use provider::ZohoProvider;
pub use record::{ZohoContact, ZohoResponse};
