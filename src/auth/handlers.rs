use axum::extract::{FromRef, Query, State};
use axum::response::{Redirect, Response};
use axum::Json;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::auth::dto::{
    ForgotPasswordRequest, LoginRequest, RefreshRequest, ResetPasswordRequest, SessionData,
    SignupRequest, VerifyEmailQuery,
};
use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::password::{
    generate_reset_token, generate_verification_token, hash_password, reset_token_usable,
    token_digest, verify_password,
};
use crate::email::{send_reset_token_email, send_verification_email};
use crate::error::ApiError;
use crate::response::{created, empty_success, success};
use crate::state::AppState;
use crate::users::dto::PublicUser;
use crate::users::repo::User;
use crate::validate::{normalize_email, validate_payload};

const VERIFY_TOKEN_TTL: Duration = Duration::hours(24);
const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// Usernames are only length-constrained, so the seed has to be encoded.
fn avatar_url(username: &str) -> anyhow::Result<String> {
    let url = reqwest::Url::parse_with_params(
        "https://api.dicebear.com/7.x/micah/svg",
        [("seed", username)],
    )?;
    Ok(url.to_string())
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    payload.email = normalize_email(&payload.email);
    validate_payload(&payload)?;

    // Friendly pre-check; the unique constraints remain the arbiter for
    // concurrent signups.
    if User::find_by_email(&state.db, &payload.email).await?.is_some()
        || User::find_by_username(&state.db, &payload.username)
            .await?
            .is_some()
    {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let profile_picture = avatar_url(&payload.username)?;

    let verify_token = generate_verification_token();
    let user = User::create(
        &state.db,
        &payload.username,
        &payload.email,
        &password_hash,
        &profile_picture,
        &token_digest(&verify_token),
        OffsetDateTime::now_utc() + VERIFY_TOKEN_TTL,
    )
    .await?;

    let link = format!(
        "{}/api/v1/auth/verify-email?token={}",
        state.config.public_base_url, verify_token
    );
    send_verification_email(state.mailer.as_ref(), &user.email, &user.username, &link)
        .await
        .map_err(|e| ApiError::Upstream(format!("verification email failed: {e}")))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(created(
        PublicUser::from(user),
        "User registration successful, please check your mail to verify your account",
    ))
}

#[instrument(skip(state, query))]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Redirect, ApiError> {
    validate_payload(&query)?;

    let login_url = &state.config.login_redirect_url;
    let user = User::find_by_verification_digest(&state.db, &token_digest(&query.token)).await?;

    let Some(user) = user else {
        warn!("email verification with invalid or expired token");
        return Ok(Redirect::to(&format!(
            "{login_url}?success=false&message=Invalid%20or%20expired%20token"
        )));
    };

    User::mark_verified(&state.db, user.id).await?;
    info!(user_id = %user.id, "email verified");
    Ok(Redirect::to(&format!(
        "{login_url}?success=true&message=User%20Email%20verified%20successfully"
    )))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    payload.email = normalize_email(&payload.email);
    validate_payload(&payload)?;

    // Unknown email and wrong password are indistinguishable to the caller.
    let invalid = || ApiError::Auth("Invalid credentials".into());

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(invalid());
    }

    if !user.is_verified {
        return Err(ApiError::Auth("Account is not verified".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id, &user.username)?;
    let refresh_token = keys.sign_refresh(user.id, &user.username)?;

    // Rotation: the stored token is the only refresh token honored.
    User::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(success(
        SessionData {
            user: user.into(),
            access_token,
            refresh_token,
        },
        "Login successful",
    ))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;

    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Auth("Invalid token".into()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid token".into()))?;

    // A rotated-away or revoked token no longer matches the stored one.
    if user.refresh_token.as_deref() != Some(payload.refresh_token.as_str()) {
        warn!(user_id = %user.id, "refresh with stale or revoked token");
        return Err(ApiError::Auth("Invalid token".into()));
    }

    let access_token = keys.sign_access(user.id, &user.username)?;
    let refresh_token = keys.sign_refresh(user.id, &user.username)?;
    User::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    Ok(success(
        SessionData {
            user: user.into(),
            access_token,
            refresh_token,
        },
        "Session refreshed",
    ))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    // Idempotent: clearing an already-cleared token is fine.
    User::set_refresh_token(&state.db, auth.id, None).await?;
    info!(user_id = %auth.id, "user logged out");
    Ok(empty_success("Logged out successfully"))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let reset = generate_reset_token()?;
    User::set_reset_token(
        &state.db,
        user.id,
        &reset.hash,
        OffsetDateTime::now_utc() + RESET_TOKEN_TTL,
    )
    .await?;

    send_reset_token_email(state.mailer.as_ref(), &user.email, &reset.token)
        .await
        .map_err(|e| ApiError::Upstream(format!("reset email failed: {e}")))?;

    info!(user_id = %user.id, "password reset token issued");
    Ok(success(
        json!({ "email": user.email }),
        "Password reset email sent",
    ))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if !reset_token_usable(
        user.reset_token_hash.as_deref(),
        user.reset_token_expiry,
        &payload.reset_token,
        OffsetDateTime::now_utc(),
    ) {
        return Err(ApiError::Validation("Invalid or expired reset token".into()));
    }

    let password_hash = hash_password(&payload.new_password)?;
    User::reset_password(&state.db, user.id, &password_hash).await?;

    info!(user_id = %user.id, "password reset");
    Ok(success(
        json!({ "email": user.email }),
        "Password reset successful",
    ))
}
