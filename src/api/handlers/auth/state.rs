//! Configuration and shared state for the auth handlers.

use super::rate_limit::OtpRatePolicy;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

const DEFAULT_JWT_ISSUER: &str = "Fuego App";
const DEFAULT_JWT_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_OTP_TTL_SECONDS: i64 = 5 * 60;
const DEFAULT_OTP_MIN_INTERVAL_SECONDS: i64 = 60;
const DEFAULT_OTP_MAX_PER_HOUR: i64 = 5;
const DEFAULT_OTP_MAX_PER_DAY: i64 = 10;
const DEFAULT_OTP_MAX_ATTEMPTS: i32 = 5;

/// Auth configuration, built once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    frontend_base_url: String,
    jwt_secret: SecretString,
    jwt_issuer: String,
    jwt_ttl_seconds: i64,
    otp_ttl_seconds: i64,
    otp_min_interval_seconds: i64,
    otp_max_per_hour: i64,
    otp_max_per_day: i64,
    otp_max_attempts: i32,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String, jwt_secret: SecretString) -> Self {
        Self {
            frontend_base_url,
            jwt_secret,
            jwt_issuer: DEFAULT_JWT_ISSUER.to_string(),
            jwt_ttl_seconds: DEFAULT_JWT_TTL_SECONDS,
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            otp_min_interval_seconds: DEFAULT_OTP_MIN_INTERVAL_SECONDS,
            otp_max_per_hour: DEFAULT_OTP_MAX_PER_HOUR,
            otp_max_per_day: DEFAULT_OTP_MAX_PER_DAY,
            otp_max_attempts: DEFAULT_OTP_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_jwt_issuer(mut self, issuer: String) -> Self {
        self.jwt_issuer = issuer;
        self
    }

    #[must_use]
    pub const fn with_jwt_ttl_seconds(mut self, seconds: i64) -> Self {
        self.jwt_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub const fn with_otp_ttl_seconds(mut self, seconds: i64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub const fn with_otp_min_interval_seconds(mut self, seconds: i64) -> Self {
        self.otp_min_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub const fn with_otp_max_per_hour(mut self, limit: i64) -> Self {
        self.otp_max_per_hour = limit;
        self
    }

    #[must_use]
    pub const fn with_otp_max_per_day(mut self, limit: i64) -> Self {
        self.otp_max_per_day = limit;
        self
    }

    #[must_use]
    pub const fn with_otp_max_attempts(mut self, attempts: i32) -> Self {
        self.otp_max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(crate) fn jwt_issuer(&self) -> &str {
        &self.jwt_issuer
    }

    pub(crate) const fn jwt_ttl_seconds(&self) -> i64 {
        self.jwt_ttl_seconds
    }

    pub(crate) const fn otp_ttl_seconds(&self) -> i64 {
        self.otp_ttl_seconds
    }

    pub(crate) const fn otp_max_attempts(&self) -> i32 {
        self.otp_max_attempts
    }

    pub(super) const fn rate_policy(&self) -> OtpRatePolicy {
        OtpRatePolicy::new(
            self.otp_min_interval_seconds,
            self.otp_max_per_hour,
            self.otp_max_per_day,
        )
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("frontend_base_url", &self.frontend_base_url)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_ttl_seconds", &self.jwt_ttl_seconds)
            .field("otp_ttl_seconds", &self.otp_ttl_seconds)
            .field("otp_min_interval_seconds", &self.otp_min_interval_seconds)
            .field("otp_max_per_hour", &self.otp_max_per_hour)
            .field("otp_max_per_day", &self.otp_max_per_day)
            .field("otp_max_attempts", &self.otp_max_attempts)
            .finish()
    }
}

/// Shared auth state carried as an axum extension.
pub struct AuthState {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}
