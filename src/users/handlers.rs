use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::response::{empty_success, success};
use crate::state::AppState;
use crate::users::dto::{PublicUser, UpdateUserRequest, UserProfile, UserSearchQuery};
use crate::users::repo::User;
use crate::validate::{normalize_email, validate_payload};

#[instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let users = User::list_all(&state.db).await?;
    let users: Vec<PublicUser> = users.into_iter().map(PublicUser::from).collect();
    Ok(success(users, "All users fetched successfully"))
}

#[instrument(skip(state, _auth))]
pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> Result<Response, ApiError> {
    validate_payload(&query)?;
    let users = User::search(&state.db, &query.term).await?;
    if users.is_empty() {
        return Err(ApiError::NotFound("No user found".into()));
    }
    let users: Vec<PublicUser> = users.into_iter().map(PublicUser::from).collect();
    Ok(success(users, "User fetched successfully"))
}

#[instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    let followers = User::followers_of(&state.db, id).await?;
    let following = User::following_of(&state.db, id).await?;
    let profile = UserProfile {
        user: user.into(),
        followers,
        following,
    };
    Ok(success(profile, "User fetched successfully"))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    // Same canonical form as signup, or a case-variant of an existing email
    // would slip past the uniqueness pre-check below.
    if let Some(email) = payload.email.as_deref() {
        payload.email = Some(normalize_email(email));
    }
    validate_payload(&payload)?;

    let existing = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Pre-checks keep the common case friendly; the unique constraints
    // still settle any race.
    if let Some(email) = payload.email.as_deref() {
        if email != existing.email && User::find_by_email(&state.db, email).await?.is_some() {
            return Err(ApiError::Conflict("Email already taken".into()));
        }
    }
    if let Some(username) = payload.username.as_deref() {
        if username != existing.username
            && User::find_by_username(&state.db, username).await?.is_some()
        {
            return Err(ApiError::Conflict("Username already taken".into()));
        }
    }

    let updated = User::update(
        &state.db,
        id,
        payload.username.as_deref(),
        payload.email.as_deref(),
        payload.location.as_deref(),
        payload.profile_picture.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = %id, "user updated");
    Ok(success(
        PublicUser::from(updated),
        "User updated successfully",
    ))
}

#[instrument(skip(state, _auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User with given id not found".into()));
    }
    info!(user_id = %id, "user deleted");
    Ok(empty_success("User deleted successfully"))
}

#[instrument(skip(state))]
pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    if auth.id == id {
        return Err(ApiError::Validation("Cannot follow yourself".into()));
    }
    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }
    User::follow(&state.db, auth.id, id).await?;
    Ok(empty_success("User followed successfully"))
}

#[instrument(skip(state))]
pub async fn unfollow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    User::unfollow(&state.db, auth.id, id).await?;
    Ok(empty_success("User unfollowed successfully"))
}
