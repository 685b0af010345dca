// AWS SSO OIDC device authorization
mod oidc;
mod prompt;

pub use oidc::OidcClient;
pub use prompt::{LoginPrompt, TerminalPrompt};

use crate::error::{ErrorPolicy, Result, SsoError};
use crate::models::{AccessToken, ClientRegistration, DeviceAuthorization};
use async_trait::async_trait;

#[cfg(test)]
pub use prompt::MockLoginPrompt;

/// The three SSO-OIDC calls of the device authorization grant
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OidcApi: Send + Sync {
    /// Register a public client for this run
    async fn register_client(&self) -> Result<ClientRegistration>;

    /// Ask for a device code and the URL the user has to visit
    async fn start_device_authorization(
        &self,
        registration: &ClientRegistration,
        start_url: &str,
    ) -> Result<DeviceAuthorization>;

    /// Exchange the device code for an access token, once
    async fn create_token(
        &self,
        registration: &ClientRegistration,
        device_code: &str,
    ) -> Result<AccessToken>;
}

/// Run the device flow: register, authorize, let the user log in, fetch the token.
///
/// Under [`ErrorPolicy::Lenient`] a failed step is reported and the next one
/// runs with an empty value, so the worst case is an empty token that the
/// listing calls will reject.
pub async fn authenticate<O, P>(
    oidc: &O,
    prompt: &P,
    start_url: &str,
    policy: ErrorPolicy,
) -> Result<AccessToken>
where
    O: OidcApi + ?Sized,
    P: LoginPrompt + ?Sized,
{
    tracing::debug!("Starting device flow for: {}", start_url);

    let registration = policy.absorb(oidc.register_client().await)?;

    let authorization =
        policy.absorb(oidc.start_device_authorization(&registration, start_url).await)?;

    prompt.show_verification_url(&authorization.verification_uri_complete);

    match prompt.wait_for_confirmation().await {
        Err(err @ SsoError::ConfirmationTimeout(_)) => return Err(err),
        outcome => policy.absorb(outcome)?,
    }

    let token =
        policy.absorb(oidc.create_token(&registration, &authorization.device_code).await)?;

    if token.is_empty() {
        tracing::debug!("Continuing without an access token");
    }
    Ok(token)
}
