//! Candidate search: the outbound matcher, per-visitor session state and the
//! HTTP handlers that tie them to the search page.

pub mod client;
pub mod handlers;
pub mod session;

pub use client::HttpMatcher;
pub use session::SessionStore;
