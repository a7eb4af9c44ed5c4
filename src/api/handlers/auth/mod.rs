//! Email OTP authentication.
//!
//! Issuance (`send-otp`/`resend-otp`), verification (`verify-otp`/`signin`),
//! and JWT session checks share the storage and policy modules below.

pub(crate) mod issue;
mod rate_limit;
pub(crate) mod session;
mod state;
pub(crate) mod storage;
pub(crate) mod token;
pub(crate) mod types;
mod utils;
pub(crate) mod verify;

pub use state::{AuthConfig, AuthState};
