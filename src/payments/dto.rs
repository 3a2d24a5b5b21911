use serde::Deserialize;
use validator::{Validate, ValidationError};

fn default_initiate_type() -> String {
    "inline".to_string()
}

/// Registration/payment request for an event; open to unauthenticated
/// callers so people without an account can register too.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterEventRequest {
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[serde(default = "default_initiate_type")]
    pub initiate_type: String,
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
    #[validate(url)]
    pub callback_url: String,
}

const ALLOWED_CURRENCIES: &[&str] = &["NGN"];

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if ALLOWED_CURRENCIES.contains(&currency) {
        return Ok(());
    }
    let mut err = ValidationError::new("currency");
    err.message = Some("unsupported currency".into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_payload;

    fn request() -> RegisterEventRequest {
        RegisterEventRequest {
            customer_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            amount: 5000.0,
            initiate_type: "inline".into(),
            currency: "NGN".into(),
            callback_url: "https://example.com/callback".into(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_payload(&request()).is_ok());
    }

    #[test]
    fn zero_amount_rejected() {
        let mut r = request();
        r.amount = 0.0;
        assert!(validate_payload(&r).is_err());
    }

    #[test]
    fn unsupported_currency_rejected() {
        let mut r = request();
        r.currency = "USD".into();
        let err = validate_payload(&r).unwrap_err();
        assert!(format!("{err}").contains("currency"));
    }

    #[test]
    fn initiate_type_defaults_to_inline() {
        let r: RegisterEventRequest = serde_json::from_value(serde_json::json!({
            "customer_name": "Ada",
            "email": "ada@example.com",
            "amount": 10.5,
            "currency": "NGN",
            "callback_url": "https://example.com/cb"
        }))
        .unwrap();
        assert_eq!(r.initiate_type, "inline");
    }
}
