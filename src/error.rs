use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsoError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Failed to register client: {0}")]
    RegisterClient(String),

    #[error("Failed to start device authorization: {0}")]
    DeviceAuthorization(String),

    #[error("Failed to create token: {0}")]
    CreateToken(String),

    #[error("Authorization pending - login was not approved in the browser before ENTER was pressed")]
    AuthorizationPending,

    #[error("Authorization expired - user took too long to complete device flow")]
    AuthorizationExpired,

    #[error("Failed to list accounts: {0}")]
    ListAccounts(String),

    #[error("Failed to list roles for account {account_id}: {message}")]
    ListAccountRoles { account_id: String, message: String },

    #[error("Timed out after {}s waiting for login confirmation", .0.as_secs())]
    ConfirmationTimeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SsoError>;

/// What to do when an AWS call fails.
///
/// `Lenient` reports the error and carries on with an empty value, which is
/// how the tool has always behaved. `Strict` stops at the first failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    #[default]
    Lenient,
    Strict,
}

impl ErrorPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }

    /// Apply the policy to the outcome of one external call.
    pub fn absorb<T: Default>(self, result: Result<T>) -> Result<T> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (Self::Lenient, Err(err)) => {
                tracing::warn!("{}", err);
                Ok(T::default())
            }
            (Self::Strict, Err(err)) => Err(err),
        }
    }
}
