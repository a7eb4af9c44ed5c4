use anyhow::{Context, Result};
use clap::{Arg, Command};

pub const ARG_SMTP_HOST: &str = "smtp-host";
pub const ARG_SMTP_PORT: &str = "smtp-port";
pub const ARG_SMTP_USERNAME: &str = "smtp-username";
pub const ARG_SMTP_PASSWORD: &str = "smtp-password";
pub const ARG_EMAIL_FROM: &str = "email-from";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SMTP_HOST)
                .long(ARG_SMTP_HOST)
                .help("SMTP relay host, OTP emails are logged when unset")
                .env("FUEGO_SMTP_HOST"),
        )
        .arg(
            Arg::new(ARG_SMTP_PORT)
                .long(ARG_SMTP_PORT)
                .help("SMTP relay port")
                .env("FUEGO_SMTP_PORT")
                .default_value("587")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SMTP_USERNAME)
                .long(ARG_SMTP_USERNAME)
                .help("SMTP username")
                .env("FUEGO_SMTP_USERNAME"),
        )
        .arg(
            Arg::new(ARG_SMTP_PASSWORD)
                .long(ARG_SMTP_PASSWORD)
                .help("SMTP password")
                .env("FUEGO_SMTP_PASSWORD"),
        )
        .arg(
            Arg::new(ARG_EMAIL_FROM)
                .long(ARG_EMAIL_FROM)
                .help("From address for outbound email")
                .env("FUEGO_EMAIL_FROM")
                .default_value("Fuego App <team@fuego.com>"),
        )
}

#[derive(Debug)]
pub struct Options {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_from: String,
}

impl Options {
    /// Extract the email options from parsed matches
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is missing
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let smtp_port = matches
            .get_one::<u16>(ARG_SMTP_PORT)
            .copied()
            .context("missing SMTP port")?;

        let email_from = matches
            .get_one::<String>(ARG_EMAIL_FROM)
            .cloned()
            .context("missing From address")?;

        Ok(Self {
            smtp_host: matches.get_one::<String>(ARG_SMTP_HOST).cloned(),
            smtp_port,
            smtp_username: matches.get_one::<String>(ARG_SMTP_USERNAME).cloned(),
            smtp_password: matches.get_one::<String>(ARG_SMTP_PASSWORD).cloned(),
            email_from,
        })
    }
}
