use super::OidcApi;
use crate::error::{Result, SsoError};
use crate::models::{AccessToken, ClientRegistration, DeviceAuthorization};
use async_trait::async_trait;
use aws_sdk_ssooidc::error::ProvideErrorMetadata;
use aws_sdk_ssooidc::Client as SsoOidcClient;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_types::SdkConfig;

const CLIENT_NAME: &str = "gen-aws-sso-config";
const CLIENT_TYPE: &str = "public";
const PORTAL_SCOPE: &str = "sso-portal:*";
const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// OIDC client for AWS SSO device flow authentication
pub struct OidcClient {
    client: SsoOidcClient,
}

impl OidcClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: SsoOidcClient::new(config),
        }
    }
}

#[async_trait]
impl OidcApi for OidcClient {
    async fn register_client(&self) -> Result<ClientRegistration> {
        tracing::debug!("Registering client with SSO-OIDC");

        let response = self
            .client
            .register_client()
            .client_name(CLIENT_NAME)
            .client_type(CLIENT_TYPE)
            .scopes(PORTAL_SCOPE)
            .send()
            .await
            .map_err(|e| SsoError::RegisterClient(DisplayErrorContext(&e).to_string()))?;

        let client_id = response
            .client_id()
            .ok_or_else(|| SsoError::RegisterClient("No client_id in response".to_string()))?
            .to_string();

        let client_secret = response
            .client_secret()
            .ok_or_else(|| SsoError::RegisterClient("No client_secret in response".to_string()))?
            .to_string();

        tracing::debug!("Client registered successfully");
        Ok(ClientRegistration {
            client_id,
            client_secret,
        })
    }

    async fn start_device_authorization(
        &self,
        registration: &ClientRegistration,
        start_url: &str,
    ) -> Result<DeviceAuthorization> {
        tracing::debug!("Starting device authorization for: {}", start_url);

        let response = self
            .client
            .start_device_authorization()
            .client_id(&registration.client_id)
            .client_secret(&registration.client_secret)
            .start_url(start_url)
            .send()
            .await
            .map_err(|e| SsoError::DeviceAuthorization(DisplayErrorContext(&e).to_string()))?;

        let device_code = response
            .device_code()
            .ok_or_else(|| SsoError::DeviceAuthorization("No device_code in response".to_string()))?
            .to_string();

        let verification_uri_complete = response
            .verification_uri_complete()
            .or_else(|| response.verification_uri())
            .ok_or_else(|| {
                SsoError::DeviceAuthorization("No verification_uri in response".to_string())
            })?
            .to_string();

        tracing::debug!(
            "Device code issued, expires in {} seconds",
            response.expires_in()
        );

        Ok(DeviceAuthorization {
            device_code,
            verification_uri_complete,
        })
    }

    async fn create_token(
        &self,
        registration: &ClientRegistration,
        device_code: &str,
    ) -> Result<AccessToken> {
        let response = self
            .client
            .create_token()
            .client_id(&registration.client_id)
            .client_secret(&registration.client_secret)
            .grant_type(DEVICE_CODE_GRANT_TYPE)
            .device_code(device_code)
            .send()
            .await
            .map_err(|err| {
                tracing::debug!(
                    "CreateToken error: {} - {}",
                    err.code().unwrap_or("unknown"),
                    err.message().unwrap_or("")
                );

                match err.code() {
                    Some("AuthorizationPendingException") => SsoError::AuthorizationPending,
                    Some("ExpiredTokenException") => SsoError::AuthorizationExpired,
                    _ => SsoError::CreateToken(DisplayErrorContext(&err).to_string()),
                }
            })?;

        let access_token = response
            .access_token()
            .ok_or_else(|| SsoError::CreateToken("No access_token in response".to_string()))?;

        tracing::debug!("Token expires in {} seconds", response.expires_in());
        Ok(AccessToken::new(access_token))
    }
}
