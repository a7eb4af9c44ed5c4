//! Database helpers for OTP and identity state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::is_unique_violation;

/// A stored OTP issuance.
#[derive(Clone, Debug)]
pub(super) struct OtpRecord {
    pub(super) id: Uuid,
    pub(super) code: String,
    pub(super) expires_at: DateTime<Utc>,
    pub(super) sent_at: DateTime<Utc>,
    pub(super) attempts: i32,
}

/// Minimal identity fields the auth flows need.
#[derive(Clone, Debug)]
pub(crate) struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) email_verified: bool,
}

/// Outcome when attempting to create a verified user after signup.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(UserRecord),
    Conflict,
}

/// Purge expired codes. Runs lazily at the start of issuance and
/// verification, there is no background sweeper.
pub(super) async fn delete_expired_otps(pool: &PgPool, now: DateTime<Utc>) -> Result<u64> {
    let query = "DELETE FROM otps WHERE expires_at < $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(now)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete expired otps")?;

    Ok(result.rows_affected())
}

pub(super) async fn insert_otp(
    pool: &PgPool,
    email: &str,
    code: &str,
    expires_at: DateTime<Utc>,
    sent_at: DateTime<Utc>,
) -> Result<OtpRecord> {
    let query = r"
        INSERT INTO otps
            (email, code, expires_at, sent_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, attempts
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .bind(sent_at)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert otp")?;

    Ok(OtpRecord {
        id: row.get("id"),
        code: code.to_string(),
        expires_at,
        sent_at,
        attempts: row.get("attempts"),
    })
}

/// The latest issuance for an email, by `sent_at`.
pub(super) async fn most_recent_otp(pool: &PgPool, email: &str) -> Result<Option<OtpRecord>> {
    let query = r"
        SELECT id, code, expires_at, sent_at, attempts
        FROM otps
        WHERE email = $1
        ORDER BY sent_at DESC
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup most recent otp")?;

    Ok(row.map(|row| OtpRecord {
        id: row.get("id"),
        code: row.get("code"),
        expires_at: row.get("expires_at"),
        sent_at: row.get("sent_at"),
        attempts: row.get("attempts"),
    }))
}

/// Count issuances for an email since a window start.
pub(super) async fn count_otps_since(
    pool: &PgPool,
    email: &str,
    since: DateTime<Utc>,
) -> Result<i64> {
    let query = "SELECT COUNT(*) AS count FROM otps WHERE email = $1 AND sent_at >= $2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(since)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to count otps")?;

    Ok(row.get("count"))
}

/// Delete a single code. Returns false when the row was already gone, which
/// callers use to detect a concurrent consumption.
pub(super) async fn delete_otp(pool: &PgPool, id: Uuid) -> Result<bool> {
    let query = "DELETE FROM otps WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete otp")?;

    Ok(result.rows_affected() > 0)
}

/// Record a failed guess in a single atomic statement and return the new
/// count. `None` when the row raced away.
pub(super) async fn increment_otp_attempts(pool: &PgPool, id: Uuid) -> Result<Option<i32>> {
    let query = "UPDATE otps SET attempts = attempts + 1 WHERE id = $1 RETURNING attempts";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to increment otp attempts")?;

    Ok(row.map(|row| row.get("attempts")))
}

pub(super) async fn lookup_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = "SELECT id, email, email_verified FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        email_verified: row.get("email_verified"),
    }))
}

/// Create a verified identity. The unique email constraint is the only guard
/// against concurrent signups for the same address.
pub(super) async fn insert_verified_user(pool: &PgPool, email: &str) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users
            (email, email_verified)
        VALUES ($1, TRUE)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(UserRecord {
            id: row.get("id"),
            email: email.to_string(),
            email_verified: true,
        })),
        Err(err) => {
            if is_unique_violation(&err) {
                return Ok(SignupOutcome::Conflict);
            }
            Err(err).context("failed to insert user")
        }
    }
}

/// Touch `updated_at` after a successful sign-in.
pub(super) async fn touch_user_activity(pool: &PgPool, user_id: Uuid) -> Result<()> {
    let query = "UPDATE users SET updated_at = NOW() WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to touch user activity")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_outcome_debug_names() {
        let created = SignupOutcome::Created(UserRecord {
            id: Uuid::nil(),
            email: "a@example.com".to_string(),
            email_verified: true,
        });
        assert!(format!("{created:?}").starts_with("Created"));
        assert_eq!(format!("{:?}", SignupOutcome::Conflict), "Conflict");
    }

    #[test]
    fn otp_record_holds_fields() {
        let now = Utc::now();
        let record = OtpRecord {
            id: Uuid::nil(),
            code: "123456".to_string(),
            expires_at: now,
            sent_at: now,
            attempts: 0,
        };
        assert_eq!(record.code, "123456");
        assert_eq!(record.attempts, 0);
    }
}
