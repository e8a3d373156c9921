//! # cookie-events
//!
//! Structured cookie access with semantic change events.
//!
//! `cookie-events` reads the raw cookie header into an ordered, JSON-aware
//! snapshot, writes cookies through RFC 6265 setter strings, and turns
//! the host's raw change notifications into `insert`, `update`, `delete`,
//! `clear` and `change` events.
//!
//! ## Quick Start
//!
//! ```rust
//! use cookie_events::client::CookieClient;
//! use cookie_events::cookies::{CookieAttributes, CookieMonster};
//! use std::sync::Arc;
//!
//! let jar = Arc::new(CookieMonster::new());
//! let client = CookieClient::new(jar);
//!
//! client.set_cookie("theme", "dark", &CookieAttributes::new().expires(3600));
//! client.refresh();
//! assert!(client.has_cookie("theme"));
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and context helpers
//! - [`cookies`] - Codec, snapshots, date resolution and cookie hosts
//! - [`events`] - Change classification and subscriber dispatch
//! - [`client`] - The application-facing [`CookieClient`](client::CookieClient)

pub mod base;
pub mod client;
pub mod cookies;
pub mod events;

pub use base::cookieerror::CookieError;
pub use client::{ClientOptions, CookieClient, CookieClientBuilder};
