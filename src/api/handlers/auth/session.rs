//! Bearer session check.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::state::AuthState;
use super::token::{SessionClaims, verify_session_token};
use super::types::{ErrorKind, ErrorResponse, SessionResponse};
use super::utils::extract_bearer_token;

/// Authenticate a request from its `Authorization: Bearer` header.
///
/// Missing header and invalid token produce the same opaque 401.
pub(crate) fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<SessionClaims, ErrorResponse> {
    extract_bearer_token(headers)
        .and_then(|token| verify_session_token(state, token))
        .ok_or_else(|| ErrorResponse::new(ErrorKind::InvalidToken, "Invalid or expired token"))
}

/// Report the session bound to the presented token.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Valid session", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    match authenticate(&auth_state, &headers) {
        Ok(claims) => (
            StatusCode::OK,
            Json(SessionResponse {
                user_id: claims.user_id,
                email: claims.email,
                verified: claims.verified,
            }),
        )
            .into_response(),
        Err(response) => response.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::AuthConfig;
    use crate::api::handlers::auth::token::issue_session_token;
    use crate::api::handlers::auth::storage::UserRecord;
    use axum::body::to_bytes;
    use axum::http::{HeaderValue, header::AUTHORIZATION};
    use chrono::Utc;
    use secrecy::SecretString;
    use uuid::Uuid;

    fn auth_state() -> Arc<AuthState> {
        Arc::new(AuthState::new(AuthConfig::new(
            "http://localhost:3000".to_string(),
            SecretString::from("test-secret".to_string()),
        )))
    }

    #[tokio::test]
    async fn session_missing_header() {
        let response = session(HeaderMap::new(), Extension(auth_state()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_garbage_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
        let response = session(headers, Extension(auth_state()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_valid_token() -> anyhow::Result<()> {
        let state = auth_state();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: "new@fuego.com".to_string(),
            email_verified: true,
        };
        let token = issue_session_token(&state, &user, Utc::now())?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        let response = session(headers, Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(body["userId"], user.id.to_string());
        assert_eq!(body["email"], "new@fuego.com");
        assert_eq!(body["verified"], true);
        Ok(())
    }
}
