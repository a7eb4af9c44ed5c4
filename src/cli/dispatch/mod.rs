//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, email};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    // Validate SMTP credentials relative to the relay host
    crate::cli::commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    let auth_opts = auth::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        frontend_base_url: auth_opts.frontend_base_url,
        jwt_secret: SecretString::from(auth_opts.jwt_secret),
        jwt_issuer: auth_opts.jwt_issuer,
        jwt_ttl_seconds: auth_opts.jwt_ttl_seconds,
        otp_ttl_seconds: auth_opts.otp_ttl_seconds,
        otp_min_interval_seconds: auth_opts.otp_min_interval_seconds,
        otp_max_per_hour: auth_opts.otp_max_per_hour,
        otp_max_per_day: auth_opts.otp_max_per_day,
        otp_max_attempts: auth_opts.otp_max_attempts,
        smtp_host: email_opts.smtp_host,
        smtp_port: email_opts.smtp_port,
        smtp_username: email_opts.smtp_username,
        smtp_password: email_opts.smtp_password.map(SecretString::from),
        email_from: email_opts.email_from,
    }))
}
