use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::SquadConfig;
use crate::error::ApiError;

/// Amounts go to the provider in minor units (kobo).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[derive(Debug, Serialize)]
pub struct InitiateTransaction {
    pub email: String,
    pub amount: i64,
    pub initiate_type: String,
    pub currency: String,
    pub customer_name: String,
    pub callback_url: String,
}

/// Thin adapter over the Squad transaction API.
pub struct SquadClient {
    http: reqwest::Client,
    base_url: String,
    private_key: String,
}

impl SquadClient {
    pub fn new(config: &SquadConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            private_key: config.private_key.clone(),
        }
    }

    /// Forwards an initiation request and relays the provider's `data`
    /// verbatim; any non-success outcome is an upstream failure.
    pub async fn initiate_transaction(&self, request: &InitiateTransaction) -> Result<Value, ApiError> {
        let url = format!("{}/transaction/initiate", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.private_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "payment initiation request failed");
                ApiError::Upstream("Payment provider unreachable".into())
            })?;

        let status = response.status();
        let mut body: Value = response.json().await.map_err(|e| {
            error!(error = %e, "payment provider returned non-JSON body");
            ApiError::Upstream("Invalid payment provider response".into())
        })?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("transaction initiation rejected")
                .to_string();
            error!(%status, %message, "payment initiation rejected");
            return Err(ApiError::Upstream(message));
        }

        info!(%status, "transaction initiated");
        Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_unit_conversion() {
        assert_eq!(to_minor_units(49.99), 4999);
        assert_eq!(to_minor_units(5000.0), 500_000);
        assert_eq!(to_minor_units(0.0), 0);
        // rounding, not truncation
        assert_eq!(to_minor_units(0.019), 2);
    }

    #[test]
    fn initiate_body_uses_provider_field_names() {
        let body = InitiateTransaction {
            email: "ada@example.com".into(),
            amount: 500_000,
            initiate_type: "inline".into(),
            currency: "NGN".into(),
            customer_name: "Ada".into(),
            callback_url: "https://example.com/callback".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["initiate_type"], "inline");
        assert_eq!(json["customer_name"], "Ada");
        assert_eq!(json["callback_url"], "https://example.com/callback");
        assert_eq!(json["amount"], 500_000);
    }
}
