// Account and role enumeration through the SSO portal API
mod directory;
#[cfg(test)]
pub(crate) mod fake;

pub use directory::SsoDirectory;

use crate::error::{ErrorPolicy, Result, SsoError};
use crate::models::{AccessToken, Account, AccountRole, Role};
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// One page of a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_token: None,
        }
    }
}

/// The two paginated listing calls of the SSO portal API
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn list_accounts(
        &self,
        access_token: &AccessToken,
        next_token: Option<String>,
    ) -> Result<Page<Account>>;

    async fn list_account_roles(
        &self,
        access_token: &AccessToken,
        account_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<Role>>;
}

/// Lazily walk a paginated listing, one request per page.
///
/// A missing or empty `next_token` ends the walk. A failed page is handed to
/// `policy`: lenient reports it and ends this walk (the continuation token is
/// lost with the page), strict yields the error and stops.
pub fn paginate<'a, T, F, Fut>(policy: ErrorPolicy, mut fetch: F) -> impl Stream<Item = Result<T>> + 'a
where
    T: 'a,
    F: FnMut(Option<String>) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>>> + 'a,
{
    // None: exhausted. Some(None): first page. Some(Some(token)): continuation.
    let first: Option<Option<String>> = Some(None);

    stream::unfold(first, move |cursor| {
        let request = cursor.map(&mut fetch);
        async move {
            let Some(request) = request else {
                return None;
            };

            let page = policy.absorb(request.await);
            let cursor = match &page {
                Ok(page) => page
                    .next_token
                    .clone()
                    .filter(|token| !token.is_empty())
                    .map(Some),
                Err(_) => None,
            };
            Some((page.map(|page| page.items), cursor))
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, SsoError>)))
    .try_flatten()
}

/// Every account visible to the token, in provider order
pub fn accounts<'a, D>(
    directory: &'a D,
    access_token: &'a AccessToken,
    policy: ErrorPolicy,
) -> impl Stream<Item = Result<Account>> + 'a
where
    D: AccountDirectory + ?Sized,
{
    paginate(policy, move |next_token| {
        directory.list_accounts(access_token, next_token)
    })
}

/// Every role the token may assume in `account`
pub fn account_roles<'a, D>(
    directory: &'a D,
    access_token: &'a AccessToken,
    account: Account,
    policy: ErrorPolicy,
) -> impl Stream<Item = Result<AccountRole>> + 'a
where
    D: AccountDirectory + ?Sized,
{
    let account_id = account.account_id.clone();

    paginate(policy, move |next_token| {
        let account_id = account_id.clone();
        async move {
            directory
                .list_account_roles(access_token, &account_id, next_token)
                .await
        }
    })
    .map_ok(move |role| AccountRole {
        account_id: role.account_id,
        account_name: account.account_name.clone(),
        role_name: role.role_name,
    })
}

/// Accounts flat-mapped onto their roles
pub fn entitlements<'a, D>(
    directory: &'a D,
    access_token: &'a AccessToken,
    policy: ErrorPolicy,
) -> impl Stream<Item = Result<AccountRole>> + 'a
where
    D: AccountDirectory + ?Sized,
{
    accounts(directory, access_token, policy)
        .map_ok(move |account| account_roles(directory, access_token, account, policy))
        .try_flatten()
}
