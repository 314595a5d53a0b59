//! Error types for contact provider operations.
//!
//! Every failure below the adapter facade is a [`ProviderError`]. The facade
//! is the only place that turns these into caller-facing categories, so the
//! code here stays close to what actually went wrong.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// A required setting is missing or invalid.
    ConfigurationError,
    /// The per-call credential is malformed (client-caused).
    InvalidCredential,
    /// The token endpoint rejected the refresh token or authorization code.
    AuthorizationFailed,
    /// A mutation response had the wrong outcome count or a non-SUCCESS code.
    MutationFailed,
    /// A response body or record could not be interpreted.
    ParseError,
    /// Network failure or a non-2xx status from the provider.
    TransportError,
}

impl ProviderErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::InvalidCredential => "invalid_credential",
            Self::AuthorizationFailed => "authorization_failed",
            Self::MutationFailed => "mutation_failed",
            Self::ParseError => "parse_error",
            Self::TransportError => "transport_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to a contact provider.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The provider's own error code (e.g. Zoho's `INVALID_DATA`).
    remote_code: Option<String>,
    /// HTTP status of the failing response, when there was one.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            remote_code: None,
            status: None,
            source: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Creates an invalid credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidCredential, message)
    }

    /// Creates an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationFailed, message)
    }

    /// Creates a mutation validation error.
    pub fn mutation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::MutationFailed, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ParseError, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::TransportError, message)
    }

    /// Sets the provider's own error code.
    pub fn with_remote_code(mut self, code: impl Into<String>) -> Self {
        self.remote_code = Some(code.into());
        self
    }

    /// Sets the HTTP status of the failing response.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider's own error code, if any.
    pub fn remote_code(&self) -> Option<&str> {
        self.remote_code.as_deref()
    }

    /// Returns the HTTP status, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref remote) = self.remote_code {
            write!(f, " ({})", remote)?;
        }
        Ok(())
    }
}

impl From<reqwest::Error> for ProviderError {
    /// The request URL is stripped: token requests carry secrets in the query.
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        let status = err.status().map(|s| s.as_u16());
        let mut error = Self::transport(message).with_source(err);
        error.status = status;
        error
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(
            ProviderErrorCode::InvalidCredential.as_str(),
            "invalid_credential"
        );
        assert_eq!(ProviderErrorCode::MutationFailed.to_string(), "mutation_failed");
    }

    #[test]
    fn provider_error_creation() {
        let err = ProviderError::authorization("refresh token rejected");
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
        assert_eq!(err.message(), "refresh token rejected");
        assert!(err.remote_code().is_none());
        assert!(err.status().is_none());
    }

    #[test]
    fn provider_error_display_includes_remote_code() {
        let err = ProviderError::mutation("the id given seems to be invalid")
            .with_remote_code("INVALID_DATA")
            .with_status(400);
        let display = err.to_string();
        assert!(display.starts_with("mutation_failed:"));
        assert!(display.contains("the id given seems to be invalid"));
        assert!(display.ends_with("(INVALID_DATA)"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProviderError::parse("bad body").with_source(parse_err);
        assert!(err.source().is_some());
    }
}
