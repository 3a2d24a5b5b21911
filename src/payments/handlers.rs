use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use bytes::Bytes;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::payments::client::{to_minor_units, InitiateTransaction};
use crate::payments::dto::RegisterEventRequest;
use crate::payments::webhook::{verify, SIGNATURE_HEADER};
use crate::response::{empty_success, success};
use crate::state::AppState;
use crate::validate::validate_payload;

#[instrument(skip(state, payload))]
pub async fn register_for_event(
    State(state): State<AppState>,
    Json(payload): Json<RegisterEventRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;

    let request = InitiateTransaction {
        email: payload.email,
        amount: to_minor_units(payload.amount),
        initiate_type: payload.initiate_type,
        currency: payload.currency,
        customer_name: payload.customer_name,
        callback_url: payload.callback_url,
    };

    let data = state.payments.initiate_transaction(&request).await?;
    Ok(success(data, "Transaction initiated successfully"))
}

/// Provider callback. Authenticated solely by the body signature; an
/// unverified payload is never acted upon.
#[instrument(skip(state, headers, body))]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Auth("Invalid webhook signature".into()))?;

    if !verify(&state.config.squad.private_key, &body, provided) {
        warn!("webhook signature mismatch");
        return Err(ApiError::Auth("Invalid webhook signature".into()));
    }

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => {
            let transaction_ref = payload
                .get("transaction_ref")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            info!(%transaction_ref, "webhook received");
        }
        Err(_) => info!("webhook received with non-JSON body"),
    }

    Ok(empty_success("Webhook received successfully"))
}
