//! Session token issuance and verification.

use super::{state::AuthState, storage::UserRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SessionClaims {
    #[serde(rename = "userId")]
    pub(crate) user_id: String,
    pub(crate) email: String,
    pub(crate) verified: bool,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) iss: String,
    pub(crate) sub: String,
}

/// Mint a session token for a verified identity.
pub(crate) fn issue_session_token(
    state: &AuthState,
    user: &UserRecord,
    now: DateTime<Utc>,
) -> Result<String> {
    let issued_at = now.timestamp();
    let claims = SessionClaims {
        user_id: user.id.to_string(),
        email: user.email.clone(),
        verified: user.email_verified,
        iat: issued_at,
        exp: issued_at + state.config().jwt_ttl_seconds(),
        iss: state.config().jwt_issuer().to_string(),
        sub: user.email.clone(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, state.encoding_key())
        .context("failed to sign session token")
}

/// Verify a session token and return its claims.
///
/// Every failure mode (bad signature, expired, wrong issuer, unverified
/// subject) collapses into `None` so callers cannot tell them apart.
pub(crate) fn verify_session_token(state: &AuthState, token: &str) -> Option<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[state.config().jwt_issuer()]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let data = decode::<SessionClaims>(token, state.decoding_key(), &validation).ok()?;

    if !data.claims.verified {
        return None;
    }

    Some(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::AuthConfig;
    use anyhow::Result;
    use chrono::Duration;
    use secrecy::SecretString;
    use uuid::Uuid;

    fn state() -> AuthState {
        AuthState::new(AuthConfig::new(
            "http://localhost:3000".to_string(),
            SecretString::from("test-secret".to_string()),
        ))
    }

    fn user() -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: "new@fuego.com".to_string(),
            email_verified: true,
        }
    }

    #[test]
    fn round_trip() -> Result<()> {
        let state = state();
        let user = user();
        let now = Utc::now();

        let token = issue_session_token(&state, &user, now)?;
        let claims = verify_session_token(&state, &token);

        assert!(claims.is_some());
        if let Some(claims) = claims {
            assert_eq!(claims.user_id, user.id.to_string());
            assert_eq!(claims.email, "new@fuego.com");
            assert_eq!(claims.sub, "new@fuego.com");
            assert_eq!(claims.iss, "Fuego App");
            assert!(claims.verified);
            assert_eq!(claims.exp - claims.iat, 2_592_000);
        }
        Ok(())
    }

    #[test]
    fn rejects_tampered_token() -> Result<()> {
        let state = state();
        let token = issue_session_token(&state, &user(), Utc::now())?;

        let mut tampered = token.clone();
        tampered.pop();
        assert!(verify_session_token(&state, &tampered).is_none());
        assert!(verify_session_token(&state, "garbage").is_none());
        Ok(())
    }

    #[test]
    fn rejects_wrong_secret() -> Result<()> {
        let token = issue_session_token(&state(), &user(), Utc::now())?;

        let other = AuthState::new(AuthConfig::new(
            "http://localhost:3000".to_string(),
            SecretString::from("other-secret".to_string()),
        ));
        assert!(verify_session_token(&other, &token).is_none());
        Ok(())
    }

    #[test]
    fn rejects_wrong_issuer() -> Result<()> {
        let issuing = AuthState::new(
            AuthConfig::new(
                "http://localhost:3000".to_string(),
                SecretString::from("test-secret".to_string()),
            )
            .with_jwt_issuer("Someone Else".to_string()),
        );
        let token = issue_session_token(&issuing, &user(), Utc::now())?;

        assert!(verify_session_token(&state(), &token).is_none());
        Ok(())
    }

    #[test]
    fn rejects_expired_token() -> Result<()> {
        let state = state();
        // Issued far enough back that exp is past even with validation leeway
        let issued = Utc::now() - Duration::days(31);
        let token = issue_session_token(&state, &user(), issued)?;

        assert!(verify_session_token(&state, &token).is_none());
        Ok(())
    }

    #[test]
    fn rejects_unverified_subject() -> Result<()> {
        let state = state();
        let unverified = UserRecord {
            id: Uuid::new_v4(),
            email: "new@fuego.com".to_string(),
            email_verified: false,
        };
        let token = issue_session_token(&state, &unverified, Utc::now())?;

        assert!(verify_session_token(&state, &token).is_none());
        Ok(())
    }
}
