use super::{AccountDirectory, Page};
use crate::error::{Result, SsoError};
use crate::models::{AccessToken, Account, Role};
use async_trait::async_trait;
use aws_sdk_sso::Client as SsoClient;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_types::SdkConfig;

/// Lists accounts and roles from the AWS SSO portal API
pub struct SsoDirectory {
    client: SsoClient,
}

impl SsoDirectory {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: SsoClient::new(config),
        }
    }
}

#[async_trait]
impl AccountDirectory for SsoDirectory {
    async fn list_accounts(
        &self,
        access_token: &AccessToken,
        next_token: Option<String>,
    ) -> Result<Page<Account>> {
        tracing::debug!("Listing accounts (continuation: {})", next_token.is_some());

        let response = self
            .client
            .list_accounts()
            .access_token(access_token.secret())
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| SsoError::ListAccounts(DisplayErrorContext(&e).to_string()))?;

        let items = response
            .account_list()
            .iter()
            .map(|account| Account {
                account_id: account.account_id().unwrap_or("").to_string(),
                account_name: account.account_name().unwrap_or("").to_string(),
            })
            .collect();

        Ok(Page {
            items,
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }

    async fn list_account_roles(
        &self,
        access_token: &AccessToken,
        account_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<Role>> {
        tracing::debug!("Listing roles for account {}", account_id);

        let response = self
            .client
            .list_account_roles()
            .access_token(access_token.secret())
            .account_id(account_id)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| SsoError::ListAccountRoles {
                account_id: account_id.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let items = response
            .role_list()
            .iter()
            .filter_map(|role| {
                role.role_name().map(|role_name| Role {
                    account_id: role.account_id().unwrap_or(account_id).to_string(),
                    role_name: role_name.to_string(),
                })
            })
            .collect();

        Ok(Page {
            items,
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }
}
