use anyhow::{Context, Result};
use clap::{Arg, Command};

pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";
pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_JWT_ISSUER: &str = "jwt-issuer";
pub const ARG_JWT_TTL_SECONDS: &str = "jwt-ttl-seconds";
pub const ARG_OTP_TTL_SECONDS: &str = "otp-ttl-seconds";
pub const ARG_OTP_MIN_INTERVAL_SECONDS: &str = "otp-min-interval-seconds";
pub const ARG_OTP_MAX_PER_HOUR: &str = "otp-max-per-hour";
pub const ARG_OTP_MAX_PER_DAY: &str = "otp-max-per-day";
pub const ARG_OTP_MAX_ATTEMPTS: &str = "otp-max-attempts";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_jwt_args(command);
    with_otp_args(command)
}

fn with_jwt_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL allowed by CORS")
                .env("FUEGO_FRONTEND_BASE_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign session tokens")
                .env("FUEGO_JWT_SECRET"),
        )
        .arg(
            Arg::new(ARG_JWT_ISSUER)
                .long(ARG_JWT_ISSUER)
                .help("Issuer claim for session tokens")
                .env("FUEGO_JWT_ISSUER")
                .default_value("Fuego App"),
        )
        .arg(
            Arg::new(ARG_JWT_TTL_SECONDS)
                .long(ARG_JWT_TTL_SECONDS)
                .help("Session token TTL in seconds")
                .env("FUEGO_JWT_TTL_SECONDS")
                .default_value("2592000")
                .value_parser(clap::value_parser!(i64)),
        )
}

fn with_otp_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_OTP_TTL_SECONDS)
                .long(ARG_OTP_TTL_SECONDS)
                .help("OTP expiry in seconds")
                .env("FUEGO_OTP_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_OTP_MIN_INTERVAL_SECONDS)
                .long(ARG_OTP_MIN_INTERVAL_SECONDS)
                .help("Cooldown between OTP requests for the same email")
                .env("FUEGO_OTP_MIN_INTERVAL_SECONDS")
                .default_value("60")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_OTP_MAX_PER_HOUR)
                .long(ARG_OTP_MAX_PER_HOUR)
                .help("Max OTP requests per email per hour")
                .env("FUEGO_OTP_MAX_PER_HOUR")
                .default_value("5")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_OTP_MAX_PER_DAY)
                .long(ARG_OTP_MAX_PER_DAY)
                .help("Max OTP requests per email per day")
                .env("FUEGO_OTP_MAX_PER_DAY")
                .default_value("10")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_OTP_MAX_ATTEMPTS)
                .long(ARG_OTP_MAX_ATTEMPTS)
                .help("Max failed guesses before an OTP is burned")
                .env("FUEGO_OTP_MAX_ATTEMPTS")
                .default_value("5")
                .value_parser(clap::value_parser!(i32)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub frontend_base_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl_seconds: i64,
    pub otp_ttl_seconds: i64,
    pub otp_min_interval_seconds: i64,
    pub otp_max_per_hour: i64,
    pub otp_max_per_day: i64,
    pub otp_max_attempts: i32,
}

impl Options {
    /// Extract the auth options from parsed matches
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is missing
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let frontend_base_url = matches
            .get_one::<String>(ARG_FRONTEND_BASE_URL)
            .cloned()
            .context("missing frontend base URL")?;

        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .context("missing required argument: --jwt-secret")?;

        let jwt_issuer = matches
            .get_one::<String>(ARG_JWT_ISSUER)
            .cloned()
            .context("missing JWT issuer")?;

        let jwt_ttl_seconds = matches
            .get_one::<i64>(ARG_JWT_TTL_SECONDS)
            .copied()
            .context("missing JWT TTL")?;

        let otp_ttl_seconds = matches
            .get_one::<i64>(ARG_OTP_TTL_SECONDS)
            .copied()
            .context("missing OTP TTL")?;

        let otp_min_interval_seconds = matches
            .get_one::<i64>(ARG_OTP_MIN_INTERVAL_SECONDS)
            .copied()
            .context("missing OTP min interval")?;

        let otp_max_per_hour = matches
            .get_one::<i64>(ARG_OTP_MAX_PER_HOUR)
            .copied()
            .context("missing OTP hourly limit")?;

        let otp_max_per_day = matches
            .get_one::<i64>(ARG_OTP_MAX_PER_DAY)
            .copied()
            .context("missing OTP daily limit")?;

        let otp_max_attempts = matches
            .get_one::<i32>(ARG_OTP_MAX_ATTEMPTS)
            .copied()
            .context("missing OTP attempt budget")?;

        Ok(Self {
            frontend_base_url,
            jwt_secret,
            jwt_issuer,
            jwt_ttl_seconds,
            otp_ttl_seconds,
            otp_min_interval_seconds,
            otp_max_per_hour,
            otp_max_per_day,
            otp_max_attempts,
        })
    }
}
