//! Caller-facing error types.
//!
//! The adapter facade is the only place where [`ProviderError`]s are turned
//! into these categories. Each carries the HTTP status a host framework
//! should answer with.

use thiserror::Error;
use zohocrm_providers::ProviderError;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced to the caller of the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The call itself is incomplete (missing key, URL, id or code).
    #[error("{message}")]
    BadRequest { message: String },

    /// The credential could not be used to read contacts.
    #[error("Unauthorized")]
    Unauthorized,

    /// The operation failed; the message says which one.
    #[error("{message}")]
    Server {
        message: String,
        #[source]
        source: Option<ProviderError>,
    },

    /// The accounts server refused or failed the code exchange.
    #[error("{message}")]
    Upstream {
        message: String,
        #[source]
        source: Option<ProviderError>,
    },
}

impl BridgeError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a server error without an underlying provider error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a provider error as a server error, prefixing `context`.
    pub fn from_provider(context: &str, err: ProviderError) -> Self {
        Self::Server {
            message: format!("{}: {}", context, err.message()),
            source: Some(err),
        }
    }

    /// Wraps a provider error as an upstream error, prefixing `context`.
    pub fn upstream(context: &str, err: ProviderError) -> Self {
        Self::Upstream {
            message: format!("{}: {}", context, err.message()),
            source: Some(err),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Unauthorized => 401,
            Self::Server { .. } => 500,
            Self::Upstream { .. } => 502,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(BridgeError::bad_request("No server key provided").status_code(), 400);
        assert_eq!(BridgeError::Unauthorized.status_code(), 401);
        assert_eq!(BridgeError::server("boom").status_code(), 500);
        assert_eq!(
            BridgeError::upstream("exchange", ProviderError::transport("502")).status_code(),
            502
        );
    }

    #[test]
    fn provider_context_is_kept() {
        let err = BridgeError::from_provider(
            "Could not update contact",
            ProviderError::mutation("the id given seems to be invalid").with_remote_code("INVALID_DATA"),
        );
        assert_eq!(
            err.to_string(),
            "Could not update contact: the id given seems to be invalid"
        );
        assert!(err.source().is_some());
        assert_eq!(BridgeError::Unauthorized.to_string(), "Unauthorized");
    }
}
