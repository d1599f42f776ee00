//! # Constants
//!
//! Default configuration values and fixed protocol constants.

/// Default HTTP server port for the dashboard
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default server startup timeout (seconds)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Default server readiness poll interval (milliseconds)
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 100;

/// Default timeout applied to outbound HTTP calls (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default identity provider base URL for the client-credentials grant
pub const DEFAULT_TOKEN_ISSUER_BASE: &str = "https://login.microsoftonline.com";

/// Default OAuth2 scope requested during the token exchange
pub const DEFAULT_TOKEN_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Default Microsoft Graph base URL (group-membership checks)
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// Default path to the license/billing dataset served at `/api/licenses`
pub const DEFAULT_BILLING_DATA_PATH: &str = "dat/billingData.json";

/// Default directory holding `index.html` and the `static/` assets
pub const DEFAULT_ASSET_DIR: &str = "assets";

/// Windows-authenticated secrets API path on the secret store
pub const WINAUTH_SECRETS_PATH: &str = "winauthwebservices/api/v1/secrets";

/// Secret item slug holding the Azure AD application (client) ID
pub const CLIENT_ID_SLUG: &str = "clientId";

/// Secret item slug holding the Azure AD client secret
pub const CLIENT_SECRET_SLUG: &str = "clientSecret";

/// Secret item slug holding the Azure AD tenant ID
pub const TENANT_ID_SLUG: &str = "tenantId";

/// Secret item slug holding the dashboard's allowed security group ID
pub const ALLOWED_GROUP_ID_SLUG: &str = "allowedGroupId";
