//! # Secret Store Authentication
//!
//! The secret store trusts the calling process's ambient network identity -
//! there is no credential material to manage for this hop. That platform
//! behavior is modeled as a pluggable [`StoreAuthenticator`] so tests and
//! non-Windows deployments can substitute their own variant.

use std::fmt;

use reqwest::RequestBuilder;

/// Decorates outbound secret store requests with authentication material
pub trait StoreAuthenticator: Send + Sync + fmt::Debug {
    /// Attach authentication to the request
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Ambient Windows identity authentication
///
/// The `winauthwebservices` endpoint negotiates against the process identity
/// at the transport layer; the request carries empty Basic credentials to
/// trigger the negotiation, matching the PowerShell/IWA convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientWindowsAuth;

impl StoreAuthenticator for AmbientWindowsAuth {
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth("", Some(""))
    }
}

/// No-op authenticator for tests and anonymous mock stores
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuth;

impl StoreAuthenticator for AnonymousAuth {
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(authenticator: &dyn StoreAuthenticator) -> reqwest::Request {
        let client = reqwest::Client::new();
        authenticator
            .authenticate(client.get("http://store.test/secrets/1"))
            .build()
            .unwrap()
    }

    #[test]
    fn ambient_auth_sends_empty_basic_credentials() {
        let request = build(&AmbientWindowsAuth);
        let header = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .expect("authorization header present");
        // base64(":") == "Og=="
        assert_eq!(header.to_str().unwrap(), "Basic Og==");
    }

    #[test]
    fn anonymous_auth_leaves_request_untouched() {
        let request = build(&AnonymousAuth);
        assert!(request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .is_none());
    }
}
