// CLI interface
use crate::auth::{OidcClient, TerminalPrompt};
use crate::entitlements::SsoDirectory;
use crate::env;
use crate::error::{ErrorPolicy, Result, SsoError};
use crate::generate;
use crate::models::{Params, DEFAULT_SESSION_NAME};
use clap::{CommandFactory, Parser};
use std::io::Write;
use std::time::Duration;

/// Exit status for a bad invocation
pub const USAGE_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "gen-aws-sso-config")]
#[command(
    about = "Print ~/.aws/config profiles for every account and role you can reach through IAM Identity Center",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// AWS SSO Start URL
    #[arg(long, env = "AWS_SSO_START_URL")]
    pub start_url: Option<String>,

    /// AWS IdC instance region
    #[arg(long, env = "AWS_SSO_REGION")]
    pub sso_region: Option<String>,

    /// The sso_session identifier to use in your config file
    #[arg(long, default_value = DEFAULT_SESSION_NAME)]
    pub sso_session_name: String,

    /// Abort on the first AWS error instead of reporting it and carrying on
    #[arg(long)]
    pub strict: bool,

    /// Give up waiting for the login confirmation after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub confirm_timeout: Option<u64>,

    /// Never try to open a browser, only print the login link
    #[arg(long)]
    pub headless: bool,

    /// Enable verbose/debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the run parameters; start URL and region must be non-empty.
    pub fn params(&self) -> Result<Params> {
        let start_url = required(self.start_url.as_deref(), "--start-url")?;
        let sso_region = required(self.sso_region.as_deref(), "--sso-region")?;

        let open_browser = !(self.headless || env::is_headless_environment(env::process_var));

        Ok(Params {
            start_url,
            sso_region,
            sso_session_name: self.sso_session_name.clone(),
            policy: ErrorPolicy::from_strict_flag(self.strict),
            confirm_timeout: self.confirm_timeout.map(Duration::from_secs),
            open_browser,
        })
    }
}

fn required(value: Option<&str>, flag: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SsoError::MissingArgument(flag)),
    }
}

/// Print the error and the help text, and return the exit status to use
pub fn report_usage_error<W: Write>(err: &SsoError, out: &mut W) -> i32 {
    let _ = writeln!(out, "error: {}\n", err);
    let _ = writeln!(out, "{}", Cli::command().render_help());
    USAGE_EXIT_CODE
}

/// Build the AWS collaborators and generate the config on stdout
pub async fn execute(params: Params) -> Result<()> {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(params.sso_region.clone()))
        .load()
        .await;

    let oidc = OidcClient::new(&config);
    let directory = SsoDirectory::new(&config);
    let prompt = TerminalPrompt::new(params.open_browser, params.confirm_timeout);

    let profiles = generate::run(&params, &oidc, &prompt, &directory, std::io::stdout()).await?;

    tracing::info!("Generated {} profiles", profiles);
    Ok(())
}
