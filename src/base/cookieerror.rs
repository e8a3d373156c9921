use std::io;
use thiserror::Error;

/// Errors surfaced by [`CookieClient`](crate::client::CookieClient) operations.
///
/// Malformed cookie values and unparseable dates are not errors; they degrade
/// to a raw string value and to the current time respectively.
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("Cookie [{name}] not found. Update failed!")]
    NotFound { name: String },

    #[error("Cookie enumeration failed: {source}")]
    EnumerationFailed {
        #[source]
        source: io::Error,
    },

    #[error("Cookie value serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CookieError {
    /// Create a not found error for the given cookie name.
    pub fn not_found(name: impl Into<String>) -> Self {
        CookieError::NotFound { name: name.into() }
    }

    /// Create an enumeration error from a host IO failure.
    pub fn enumeration_failed(source: io::Error) -> Self {
        CookieError::EnumerationFailed { source }
    }

    /// Whether this error leaves cookie storage untouched.
    ///
    /// `NotFound` and `Serialize` are raised before anything is written.
    /// `EnumerationFailed` may come after some removals already ran.
    pub fn is_write_free(&self) -> bool {
        !matches!(self, CookieError::EnumerationFailed { .. })
    }
}
