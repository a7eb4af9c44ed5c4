//! Request and response types for the auth endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpResponse {
    pub email: String,
    pub expires_in: i64,
    pub resend_count: i64,
    pub max_resends: i64,
    pub next_resend_available_in: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionUser {
    pub email: String,
    pub verified: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub verified: bool,
}

/// Stable error kinds exposed in the error envelope.
#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationFailed,
    RateLimited,
    NotFound,
    Expired,
    TooManyAttempts,
    InvalidCode,
    Conflict,
    Forbidden,
    DispatchFailure,
    InvalidToken,
    Internal,
}

impl ErrorKind {
    pub(crate) const fn status(self) -> StatusCode {
        match self {
            Self::ValidationFailed | Self::Expired | Self::InvalidCode => StatusCode::BAD_REQUEST,
            Self::RateLimited | Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::DispatchFailure => StatusCode::BAD_GATEWAY,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error envelope shared by every endpoint.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<i32>,
}

impl ErrorResponse {
    pub(crate) fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            fields: None,
            wait_seconds: None,
            resend_count: None,
            attempts_remaining: None,
        }
    }

    pub(crate) fn with_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub(crate) const fn with_wait_seconds(mut self, seconds: i64) -> Self {
        self.wait_seconds = Some(seconds);
        self
    }

    pub(crate) const fn with_resend_count(mut self, count: i64) -> Self {
        self.resend_count = Some(count);
        self
    }

    pub(crate) const fn with_attempts_remaining(mut self, remaining: i32) -> Self {
        self.attempts_remaining = Some(remaining);
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.error.status(), Json(self)).into_response()
    }
}

/// 500 with an opaque body, details stay in the log.
pub(crate) fn internal_error() -> ErrorResponse {
    ErrorResponse::new(ErrorKind::Internal, "Internal server error")
}
