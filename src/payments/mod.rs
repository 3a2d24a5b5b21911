use axum::routing::post;
use axum::Router;

use crate::state::AppState;

pub mod client;
pub mod dto;
pub mod handlers;
pub mod webhook;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/register", post(handlers::register_for_event))
        .route("/webhook", post(handlers::receive_webhook))
}
