use validator::Validate;

use crate::error::ApiError;

/// Canonical form for stored and compared email addresses. Applied before
/// validation and before any lookup, so `Ada@Example.com` and
/// `ada@example.com` are the same account everywhere.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Runs schema validation and folds every violated field into one
/// `ApiError::Validation`, so the client sees the full list at once.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|errors| {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let reason = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {reason}")
                })
            })
            .collect();
        parts.sort();
        ApiError::Validation(parts.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Creds {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    #[test]
    fn valid_payload_passes() {
        let p = Creds {
            email: "ada@example.com".into(),
            password: "longenough".into(),
        };
        assert!(validate_payload(&p).is_ok());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
    }

    #[test]
    fn reports_every_violated_field() {
        let p = Creds {
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let err = validate_payload(&p).unwrap_err();
        let ApiError::Validation(detail) = err else {
            panic!("expected validation error");
        };
        assert!(detail.contains("email"), "missing email violation: {detail}");
        assert!(
            detail.contains("password"),
            "missing password violation: {detail}"
        );
    }
}
