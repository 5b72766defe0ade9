use std::{
    io::{self, IsTerminal, Write},
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use installer::{Installer, WaitSettings};
use model::{
    cli_error::CliError,
    cli_output::{self, CliResult, OutputFormat},
    exit_code::FailureExitCode,
    outcome::Outcome,
    stack_name::StackName,
};
use services::{
    aws::load_sdk_config,
    cloudformation::CloudFormationClient,
    sts::{self, RetrySettings, RoleAssumer, StaticKeyRoleAssumer},
};
use tracing::{info, warn};

mod installer;
mod logging;
mod model;
mod preflight;
mod services;
mod template;

/// Install or remove an IAM user, role, inline policy and access key,
/// provisioned as a single CloudFormation stack.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the CloudFormation stack, also used to name the IAM resources
    #[arg(long, default_value = "iam-access", value_parser = StackName::parse)]
    stack_name: StackName,
    /// The AWS region, defaults to the region of your AWS environment or profile
    #[arg(long)]
    region: Option<String>,
    /// Delete the stack and everything it created
    #[arg(long)]
    uninstall: bool,
    /// The AWS profile used for connecting to AWS
    #[arg(long)]
    profile: Option<String>,
    /// Give up waiting on CloudFormation after this long, e.g. "30m"
    #[arg(long, default_value = "30m", value_parser = humantime::parse_duration)]
    timeout: Duration,
    /// How often to poll the stack status
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    poll_interval: Duration,
    /// After installing, assume the new role with the new access key
    #[arg(long, conflicts_with = "uninstall")]
    verify: bool,
    /// Set the output format
    #[arg(value_enum, short, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Log more, repeat for debug logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| exit_on_parse_error(e));
    logging::init(cli.verbose);

    let format = cli.format;
    CliResult::new(run(cli, &format).await).print_or_exit(&format);
}

async fn run(cli: Cli, format: &OutputFormat) -> Result<Outcome, CliError> {
    let config = load_sdk_config(cli.region, cli.profile).await;
    preflight::run(&config).await?;

    let api = CloudFormationClient::new(&config);
    let installer = Installer::new(
        &api,
        &cli.stack_name,
        WaitSettings {
            timeout: cli.timeout,
            poll_interval: cli.poll_interval,
        },
    )
    .with_progress(io::stderr().is_terminal());

    if cli.uninstall {
        return installer.uninstall().await;
    }

    let outcome = installer.install().await?;
    if cli.verify {
        if let Some(credentials) = outcome.credentials() {
            let assumer = StaticKeyRoleAssumer::new(&config, credentials);
            let retry = RetrySettings::default();
            verify_installed(&assumer, &outcome, format, retry, &mut io::stdout()).await?;
        }
    }

    Ok(outcome)
}

/// Assumes the installed role with the installed key. On failure the
/// credentials are written to `out` before the error is returned.
async fn verify_installed(
    assumer: &impl RoleAssumer,
    outcome: &Outcome,
    format: &OutputFormat,
    retry: RetrySettings,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(credentials) = outcome.credentials() else {
        return Ok(());
    };

    match sts::verify_role(assumer, &credentials.role_arn, retry).await {
        Ok(session_arn) => {
            info!(%session_arn, "verified the new access key can assume the role");
            Ok(())
        }
        Err(e) => {
            match cli_output::render(outcome, format) {
                Ok(text) => {
                    if let Err(write_err) = writeln!(out, "{text}") {
                        warn!("could not print the installed credentials: {write_err}");
                    }
                }
                Err(render_err) => {
                    warn!("could not print the installed credentials: {render_err}")
                }
            }
            Err(e)
        }
    }
}

/// Help and version exit with 0; every other parse failure prints usage and
/// exits with 1.
fn exit_on_parse_error(e: clap::Error) -> ! {
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = e.print();
        std::process::exit(0);
    }

    let rendered = e.render().to_string();
    eprint!("{rendered}");
    if !rendered.contains("Usage:") {
        eprintln!("\n{}", Cli::command().render_usage());
    }
    std::process::exit(FailureExitCode::Input as i32);
}
