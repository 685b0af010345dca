// gen-aws-sso-config - AWS config profiles from IAM Identity Center

mod auth;
mod cli;
mod config_file;
mod entitlements;
mod env;
mod error;
mod generate;
mod models;

use clap::Parser;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first to get verbose flag
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // stdout carries the config text, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let params = match args.params() {
        Ok(params) => params,
        Err(e) => std::process::exit(cli::report_usage_error(&e, &mut std::io::stderr())),
    };

    cli::execute(params).await
}
