use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/events/search-filter", get(handlers::search_filter_events))
        .route("/events/by-user/:id", get(handlers::events_by_user))
        .route(
            "/events/:id",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
}
