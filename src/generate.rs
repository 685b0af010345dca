// Login, enumerate, emit
use crate::auth::{self, LoginPrompt, OidcApi};
use crate::config_file::{ConfigWriter, SsoSession};
use crate::entitlements::{self, AccountDirectory};
use crate::error::Result;
use crate::models::Params;
use futures::TryStreamExt;
use std::io::Write;

const BANNER: &str = "======== ADD THE FOLLOWING TO YOUR .aws/config FILE ========";

/// Run the whole pipeline, streaming the config text to `out`.
///
/// Returns the number of profile sections written.
pub async fn run<O, P, D, W>(
    params: &Params,
    oidc: &O,
    prompt: &P,
    directory: &D,
    out: W,
) -> Result<usize>
where
    O: OidcApi + ?Sized,
    P: LoginPrompt + ?Sized,
    D: AccountDirectory + ?Sized,
    W: Write,
{
    let token = auth::authenticate(oidc, prompt, &params.start_url, params.policy).await?;

    eprintln!("{}\n", BANNER);
    let mut writer = ConfigWriter::new(out, SsoSession::from_params(params))?;

    let roles = entitlements::entitlements(directory, &token, params.policy);
    let mut roles = std::pin::pin!(roles);
    while let Some(role) = roles.try_next().await? {
        writer.write_profile(&role)?;
    }

    tracing::debug!("Wrote {} profiles", writer.profiles_written());
    Ok(writer.profiles_written())
}
