use crate::api::{
    self,
    email::{EmailSender, LogEmailSender, SmtpSender},
    handlers::auth::AuthConfig,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_base_url: String,
    pub jwt_secret: SecretString,
    pub jwt_issuer: String,
    pub jwt_ttl_seconds: i64,
    pub otp_ttl_seconds: i64,
    pub otp_min_interval_seconds: i64,
    pub otp_max_per_hour: i64,
    pub otp_max_per_day: i64,
    pub otp_max_attempts: i32,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    pub email_from: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the SMTP sender cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new(args.frontend_base_url, args.jwt_secret)
        .with_jwt_issuer(args.jwt_issuer)
        .with_jwt_ttl_seconds(args.jwt_ttl_seconds)
        .with_otp_ttl_seconds(args.otp_ttl_seconds)
        .with_otp_min_interval_seconds(args.otp_min_interval_seconds)
        .with_otp_max_per_hour(args.otp_max_per_hour)
        .with_otp_max_per_day(args.otp_max_per_day)
        .with_otp_max_attempts(args.otp_max_attempts);

    let sender: Arc<dyn EmailSender> = match args.smtp_host {
        Some(host) => Arc::new(SmtpSender::new(
            host,
            args.smtp_port,
            args.smtp_username,
            args.smtp_password,
            args.email_from,
        )?),
        None => {
            warn!("SMTP relay not configured, OTP emails will be logged only");
            Arc::new(LogEmailSender)
        }
    };

    api::new(args.port, args.dsn, auth_config, sender).await
}
