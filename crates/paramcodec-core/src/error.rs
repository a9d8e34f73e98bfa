//! Error handling for the parameter codec library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Errors fall into two groups:
//! build-time failures (`Config`, `UnknownLocation`) raised while an operation
//! codec is assembled, and call-time failures (`BadRequest`, `Conversion`)
//! raised while a single request is decoded. Call-time failures are faults of
//! the caller and map to a 400 response.
//!
//! # Examples
//!
//! ```
//! use paramcodec_core::error::{Error, Result};
//!
//! fn lookup(found: bool) -> Result<()> {
//!     if !found {
//!         return Err(Error::bad_request("parameter required"));
//!     }
//!     Ok(())
//! }
//!
//! let err = lookup(false).unwrap_err();
//! assert!(err.is_client_fault());
//! assert_eq!(err.status_code(), 400);
//! ```

use thiserror::Error;

/// Result type for parameter codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for parameter codec operations
#[derive(Debug, Error)]
pub enum Error {
    /// Incoherent descriptor or unsupported type for a location
    #[error("Configuration error: {0}")]
    Config(String),

    /// No creator registered for a location tag
    #[error("Unknown parameter location: {0}")]
    UnknownLocation(String),

    /// Required value missing from an inbound request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Raw value could not be coerced into the target type
    #[error("Cannot convert parameter '{name}': {message}")]
    Conversion { name: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Outbound HTTP request could not be assembled
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new bad-request error
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a new conversion error for the named parameter
    pub fn conversion<N: Into<String>, S: Into<String>>(name: N, msg: S) -> Self {
        Self::Conversion {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Whether the error was caused by the inbound request rather than the server
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::Conversion { .. })
    }

    /// HTTP status the invocation pipeline should answer with
    pub fn status_code(&self) -> u16 {
        if self.is_client_fault() {
            400
        } else {
            500
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_map_to_400() {
        assert_eq!(Error::bad_request("parameter required").status_code(), 400);
        assert_eq!(Error::conversion("id", "not a number").status_code(), 400);
        assert_eq!(Error::config("bad").status_code(), 500);
        assert_eq!(Error::UnknownLocation("matrix".into()).status_code(), 500);
    }

    #[test]
    fn test_messages() {
        let err = Error::conversion("id", "invalid digit");
        assert_eq!(err.to_string(), "Cannot convert parameter 'id': invalid digit");
        let err: Error = "oops".into();
        assert!(matches!(err, Error::Config(ref m) if m == "oops"));
    }
}
