//! # Credential Brokering
//!
//! Retrieval of Azure AD credentials from a Windows-authenticated secret
//! store and their exchange for an OAuth2 bearer token.
//!
//! The flow is a straight line with no caching and no retries: one
//! authenticated GET against the secret store, one POST against the identity
//! provider's token endpoint. Every call re-fetches fresh data.

pub mod auth;
pub mod error;
pub mod store;
pub mod token;
pub mod types;

pub use auth::{AmbientWindowsAuth, AnonymousAuth, StoreAuthenticator};
pub use error::CredentialError;
pub use store::SecretStoreClient;
pub use token::TokenExchanger;
pub use types::{AccessToken, AzureCredentials, SecretItem, SecretValue};
