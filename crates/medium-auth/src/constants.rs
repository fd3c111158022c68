//! Medium endpoint constants
//!
//! The API base serves every resource operation and the token exchange. The
//! authorize base is only ever opened in the user's browser.

/// Base URL of the REST API (all resource calls and `/tokens`)
pub const API_BASE: &str = "https://api.medium.com/v1";

/// Browser-facing OAuth2 authorization endpoint
pub const AUTHORIZE_ENDPOINT: &str = "https://medium.com/m/oauth/authorize";

/// The only response type the authorization endpoint supports
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

/// Query parameter carrying the authorization code on the callback request
pub const CODE_PARAMETER: &str = "code";

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "medium-config.json";
