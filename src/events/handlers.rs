use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::events::dto::{EventPayload, EventResponse, SearchFilterQuery};
use crate::events::repo::Event;
use crate::response::{created, empty_success, success};
use crate::state::AppState;
use crate::validate::validate_payload;

#[instrument(skip(state, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<EventPayload>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;

    // Creator is the session identity, never client input.
    let event = Event::create(&state.db, payload.as_new_event(auth.id)).await?;

    info!(event_id = %event.event.id, creator = %auth.id, "event created");
    Ok(created(
        EventResponse::from(event),
        "Event created successfully",
    ))
}

#[instrument(skip(state, _auth))]
pub async fn list_events(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Response, ApiError> {
    let events = Event::list_all(&state.db).await?;
    let events: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
    Ok(success(events, "Events retrieved successfully"))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let event = Event::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;
    Ok(success(
        EventResponse::from(event),
        "Event retrieved successfully",
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventPayload>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;

    let event = Event::update(&state.db, id, payload.as_new_event(auth.id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    info!(event_id = %id, "event updated");
    Ok(success(
        EventResponse::from(event),
        "Event updated successfully",
    ))
}

#[instrument(skip(state, _auth))]
pub async fn delete_event(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    // Deleting an already-deleted id is a clean not-found.
    if !Event::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Event not found".into()));
    }
    info!(event_id = %id, "event deleted");
    Ok(empty_success("Event deleted successfully"))
}

#[instrument(skip(state, _auth))]
pub async fn search_filter_events(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchFilterQuery>,
) -> Result<Response, ApiError> {
    let events = Event::search_filter(
        &state.db,
        query.search.as_deref(),
        query.location.as_deref(),
        query.date,
    )
    .await?;
    let events: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
    Ok(success(
        events,
        "Search and filter results retrieved successfully",
    ))
}

#[instrument(skip(state, _auth))]
pub async fn events_by_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let events = Event::list_by_creator(&state.db, user_id).await?;
    let events: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
    Ok(success(events, "Events retrieved successfully"))
}
