//! Purse wallet client - command line entry point.

mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::Parser;
use purse_application::ApplicationError;
use purse_infrastructure::{ClientConfig, PurseClient};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

/// Exit code when the session ended and the user has to sign in again.
const EXIT_LOGIN_REQUIRED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let signing_in = matches!(cli.command, Command::Login { .. } | Command::Register { .. });
    let login_required = Arc::new(AtomicBool::new(false));
    match run(cli, Arc::clone(&login_required)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            match classify(&err, signing_in, login_required.load(Ordering::SeqCst)) {
                Failure::SessionEnded => {
                    eprintln!("Your session has ended. Run `purse login` to sign in again.");
                    ExitCode::from(EXIT_LOGIN_REQUIRED)
                }
                Failure::BadCredentials => {
                    eprintln!("Check your email and password and try again.");
                    ExitCode::FAILURE
                }
                Failure::Other => ExitCode::FAILURE,
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Failure {
    SessionEnded,
    BadCredentials,
    Other,
}

fn classify(err: &anyhow::Error, signing_in: bool, redirected: bool) -> Failure {
    let app_err = err.downcast_ref::<ApplicationError>();
    if signing_in && app_err.and_then(ApplicationError::status) == Some(401) {
        return Failure::BadCredentials;
    }
    if redirected || app_err.is_some_and(ApplicationError::requires_login) {
        Failure::SessionEnded
    } else {
        Failure::Other
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli, login_required: Arc<AtomicBool>) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(Some(path.as_path())),
        None => ClientConfig::load(),
    }
    .context("failed to load configuration")?;

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }
    tracing::debug!(base_url = %config.base_url, "Using API");

    let client = PurseClient::from_config(
        &config,
        Arc::new(move || {
            login_required.store(true, Ordering::SeqCst);
            tracing::warn!("Session ended, sign-in required");
        }),
    )?;

    commands::execute(cli.command, &client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use purse_domain::AuthError;

    fn unauthorized() -> anyhow::Error {
        ApplicationError::Api {
            status: 401,
            code: None,
            message: "Invalid email or password".to_string(),
        }
        .into()
    }

    #[test]
    fn test_wrong_password_is_not_a_session_end() {
        assert_eq!(classify(&unauthorized(), true, false), Failure::BadCredentials);
    }

    #[test]
    fn test_rejected_refresh_ends_session() {
        let err: anyhow::Error = ApplicationError::Auth(AuthError::RefreshRejected {
            status: 401,
            message: "expired".to_string(),
        })
        .into();
        assert_eq!(classify(&err, false, false), Failure::SessionEnded);
    }

    #[test]
    fn test_redirect_flag_ends_session() {
        let err = anyhow::anyhow!("wallet lookup failed");
        assert_eq!(classify(&err, false, true), Failure::SessionEnded);
    }

    #[test]
    fn test_abandoned_refresh_is_ordinary_failure() {
        let err: anyhow::Error = ApplicationError::Auth(AuthError::RefreshAbandoned).into();
        assert_eq!(classify(&err, false, false), Failure::Other);
        assert_eq!(classify(&unauthorized(), false, false), Failure::Other);
    }
}
