use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
///
/// The password hash and any pending verification code never leave the
/// server; they are skipped on serialization and absent from public DTOs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub verification_code_expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, name, email, password_hash, is_verified, \
     verification_code, verification_code_expires_at, created_at, updated_at";

impl User {
    /// Find a user by normalized email, hidden columns included.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create an unverified user with a pending verification code.
    ///
    /// Returns the raw `sqlx::Error` so callers can tell a unique-index
    /// collision apart from other database failures.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        verification_code: &str,
        code_expires_at: OffsetDateTime,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, verification_code, verification_code_expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(verification_code)
        .bind(code_expires_at)
        .fetch_one(db)
        .await
    }

    /// Atomically consume a pending verification code.
    ///
    /// Only a row whose code matches and has not expired is updated, so a
    /// wrong, expired, or already-consumed code all report `false`.
    pub async fn confirm_email(db: &PgPool, email: &str, code: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE users
             SET is_verified = TRUE,
                 verification_code = NULL,
                 verification_code_expires_at = NULL,
                 updated_at = now()
             WHERE email = $1
               AND verification_code = $2
               AND verification_code_expires_at > now()",
        )
        .bind(email)
        .bind(code)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a user; compensation for a failed verification-mail delivery.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_user_never_contains_secrets() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            is_verified: false,
            verification_code: Some("123456".into()),
            verification_code_expires_at: Some(OffsetDateTime::now_utc()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("123456"));
        assert!(json.contains("ada@example.com"));
    }
}
