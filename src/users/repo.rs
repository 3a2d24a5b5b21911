use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record. Credential and token columns never serialize outward;
/// responses go through the DTOs in `users::dto`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    pub is_verified: bool,
    pub verify_email_token_digest: Option<String>,
    pub verify_email_token_expiry: Option<OffsetDateTime>,
    pub reset_token_hash: Option<String>,
    pub reset_token_expiry: Option<OffsetDateTime>,
    pub refresh_token: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, profile_picture, location,
    is_verified, verify_email_token_digest, verify_email_token_expiry,
    reset_token_hash, reset_token_expiry, refresh_token,
    created_at, updated_at
"#;

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Inserts an unverified user carrying a pending verification token.
    /// Unique violations on username/email surface as sqlx database errors
    /// and are mapped to a conflict at the handler boundary.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        profile_picture: &str,
        verify_token_digest: &str,
        verify_token_expiry: OffsetDateTime,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users
                (username, email, password_hash, profile_picture,
                 verify_email_token_digest, verify_email_token_expiry)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(profile_picture)
        .bind(verify_token_digest)
        .bind(verify_token_expiry)
        .fetch_one(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await
    }

    /// Case-insensitive substring search over username and email.
    pub async fn search(db: &PgPool, term: &str) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE username ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%'
            ORDER BY username
            "#
        ))
        .bind(term)
        .fetch_all(db)
        .await
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        username: Option<&str>,
        email: Option<&str>,
        location: Option<&str>,
        profile_picture: Option<&str>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                location = COALESCE($4, location),
                profile_picture = COALESCE($5, profile_picture),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(location)
        .bind(profile_picture)
        .fetch_optional(db)
        .await
    }

    /// Returns whether a row was actually deleted.
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_refresh_token(
        db: &PgPool,
        id: Uuid,
        refresh_token: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(refresh_token)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Verify-email lookup: token digest must match and not be expired.
    pub async fn find_by_verification_digest(
        db: &PgPool,
        digest: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE verify_email_token_digest = $1
              AND verify_email_token_expiry > now()
            "#
        ))
        .bind(digest)
        .fetch_optional(db)
        .await
    }

    pub async fn mark_verified(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                is_verified = TRUE,
                verify_email_token_digest = NULL,
                verify_email_token_expiry = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token_hash: &str,
        expiry: OffsetDateTime,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                reset_token_hash = $2,
                reset_token_expiry = $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expiry)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Consumes the reset token: new password in, token fields cleared.
    pub async fn reset_password(db: &PgPool, id: Uuid, password_hash: &str) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                reset_token_hash = NULL,
                reset_token_expiry = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn followers_of(db: &PgPool, id: Uuid) -> sqlx::Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT follower_id FROM user_follows WHERE followee_id = $1")
                .bind(id)
                .fetch_all(db)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn following_of(db: &PgPool, id: Uuid) -> sqlx::Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT followee_id FROM user_follows WHERE follower_id = $1")
                .bind(id)
                .fetch_all(db)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Idempotent: following an already-followed user is a no-op.
    pub async fn follow(db: &PgPool, follower: Uuid, followee: Uuid) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(follower)
        .bind(followee)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn unfollow(db: &PgPool, follower: Uuid, followee: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM user_follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower)
            .bind(followee)
            .execute(db)
            .await?;
        Ok(())
    }
}
