use crate::error::ErrorPolicy;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SESSION_NAME: &str = "my-sso";

/// Everything a run needs, resolved once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub start_url: String,
    pub sso_region: String,
    /// Name of the `[sso-session]` section the profiles point at
    pub sso_session_name: String,
    pub policy: ErrorPolicy,
    /// Bound on the wait for the user to confirm login; `None` waits forever
    pub confirm_timeout: Option<Duration>,
    pub open_browser: bool,
}

/// Public OIDC client registered for this run only
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientRegistration {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistration")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Device authorization information from StartDeviceAuthorization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub verification_uri_complete: String,
}

/// Bearer token for the SSO portal API
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("AccessToken(<empty>)")
        } else {
            f.write_str("AccessToken(<redacted>)")
        }
    }
}

/// Represents an AWS account available through SSO
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Account {
    pub account_id: String,
    pub account_name: String,
}

/// A role assignment as returned by ListAccountRoles
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Role {
    pub account_id: String,
    pub role_name: String,
}

/// Represents a role within an AWS account
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRole {
    pub account_id: String,
    pub account_name: String,
    pub role_name: String,
}

impl AccountRole {
    /// Name used for the `[profile ...]` section
    pub fn profile_name(&self) -> String {
        format!("{}-{}", self.account_name, self.role_name)
    }
}
