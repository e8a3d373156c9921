//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting host IO errors into context-rich `CookieError` variants.

use crate::base::cookieerror::CookieError;
use std::io;

/// Extension trait for adding context to IO Results returned by a cookie host.
pub trait IoResultExt<T> {
    /// Add bulk enumeration context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use cookie_events::base::context::IoResultExt;
    ///
    /// let records = host.get_all().await.enumeration_context()?;
    /// // Error: "Cookie enumeration failed: permission denied"
    /// ```
    fn enumeration_context(self) -> Result<T, CookieError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn enumeration_context(self) -> Result<T, CookieError> {
        self.map_err(|e| {
            tracing::debug!(error = %e, "cookie host enumeration failed");
            CookieError::enumeration_failed(e)
        })
    }
}
