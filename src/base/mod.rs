//! Base types and error handling.
//!
//! - [`CookieError`](cookieerror::CookieError): errors raised by client operations
//! - [`IoResultExt`](context::IoResultExt): context for host IO failures

pub mod context;
pub mod cookieerror;
