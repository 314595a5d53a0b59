//! Adapter facade and command-line host for the Zoho CRM contact bridge
//!
//! [`ZohoAdapter`] is the entry point a host framework calls with a
//! per-call [`CallContext`]; the `zohocrm` binary is a thin command-line host
//! around it.

pub mod adapter;
pub mod cli;
pub mod commands;
pub mod error;

pub use adapter::{CallContext, ConnectedAccount, OAuthCallback, ZohoAdapter};
pub use cli::Cli;
pub use error::{BridgeError, BridgeResult};
