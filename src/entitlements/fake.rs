// In-memory AccountDirectory for tests
use super::{AccountDirectory, Page};
use crate::error::{Result, SsoError};
use crate::models::{AccessToken, Account, Role};
use async_trait::async_trait;
use std::sync::Mutex;

/// Serves accounts and roles in fixed-size pages and records every request
/// as `accounts:<token>` or `roles:<account id>:<token>`.
pub(crate) struct FakeDirectory {
    accounts: Vec<(Account, Vec<String>)>,
    page_size: usize,
    empty_final_token: bool,
    fail_accounts: bool,
    fail_roles_for: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub(crate) fn new() -> Self {
        Self {
            accounts: Vec::new(),
            page_size: 100,
            empty_final_token: false,
            fail_accounts: false,
            fail_roles_for: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn account(mut self, id: &str, name: &str, roles: &[&str]) -> Self {
        let account = Account {
            account_id: id.to_string(),
            account_name: name.to_string(),
        };
        let roles = roles.iter().map(|r| r.to_string()).collect();
        self.accounts.push((account, roles));
        self
    }

    pub(crate) fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Answer the last page with `Some("")` instead of `None`
    pub(crate) fn empty_final_token(mut self) -> Self {
        self.empty_final_token = true;
        self
    }

    pub(crate) fn fail_accounts(mut self) -> Self {
        self.fail_accounts = true;
        self
    }

    pub(crate) fn fail_roles_for(mut self, account_id: &str) -> Self {
        self.fail_roles_for.push(account_id.to_string());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn page<T: Clone>(&self, items: &[T], next_token: Option<String>) -> Page<T> {
        let start: usize = next_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        let next_token = if end < items.len() {
            Some(end.to_string())
        } else if self.empty_final_token {
            Some(String::new())
        } else {
            None
        };
        Page {
            items: items[start.min(end)..end].to_vec(),
            next_token,
        }
    }
}

#[async_trait]
impl AccountDirectory for FakeDirectory {
    async fn list_accounts(
        &self,
        _access_token: &AccessToken,
        next_token: Option<String>,
    ) -> Result<Page<Account>> {
        self.record(format!("accounts:{}", next_token.clone().unwrap_or_default()));

        if self.fail_accounts {
            return Err(SsoError::ListAccounts("UnauthorizedException".to_string()));
        }

        let accounts: Vec<Account> = self.accounts.iter().map(|(a, _)| a.clone()).collect();
        Ok(self.page(&accounts, next_token))
    }

    async fn list_account_roles(
        &self,
        _access_token: &AccessToken,
        account_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<Role>> {
        self.record(format!(
            "roles:{}:{}",
            account_id,
            next_token.clone().unwrap_or_default()
        ));

        if self.fail_roles_for.iter().any(|id| id == account_id) {
            return Err(SsoError::ListAccountRoles {
                account_id: account_id.to_string(),
                message: "TooManyRequestsException".to_string(),
            });
        }

        let roles: Vec<Role> = self
            .accounts
            .iter()
            .filter(|(a, _)| a.account_id == account_id)
            .flat_map(|(a, roles)| {
                roles.iter().map(move |role_name| Role {
                    account_id: a.account_id.clone(),
                    role_name: role_name.clone(),
                })
            })
            .collect();
        Ok(self.page(&roles, next_token))
    }
}
