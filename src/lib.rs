//! # Billing Dashboard
//!
//! Backend for the internal license/billing dashboard.
//!
//! The service has two halves:
//!
//! 1. **Credential brokering** - fetches Azure AD client credentials from a
//!    Windows-authenticated secret store and exchanges them for an OAuth2
//!    bearer token via the client-credentials grant ([`secrets`]).
//! 2. **Dashboard serving** - an HTTP server exposing the license dataset at
//!    `/api/licenses` (behind group-membership authorization), the dashboard
//!    homepage, static assets, and health probes ([`server`]).
//!
//! Tests for the individual pieces live in the module files; end-to-end tests
//! against mock HTTP servers live in `tests/`.

pub mod config;
pub mod constants;
pub mod runtime;
pub mod secrets;
pub mod server;
