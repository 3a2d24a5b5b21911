use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::users::dto::PublicUser;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 20))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub reset_token: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailQuery {
    #[validate(length(min = 1))]
    pub token: String,
}

/// Returned after login and refresh: both tokens travel in the body and
/// subsequent requests carry the access token as a bearer header.
#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_payload;

    #[test]
    fn signup_rejects_bad_email_and_short_password_together() {
        let payload = SignupRequest {
            username: "ada".into(),
            email: "nope".into(),
            password: "short".into(),
        };
        let err = validate_payload(&payload).unwrap_err();
        let detail = format!("{err}");
        assert!(detail.contains("email"));
        assert!(detail.contains("password"));
    }

    #[test]
    fn signup_accepts_valid_payload() {
        let payload = SignupRequest {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "correcthorse".into(),
        };
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn reset_password_requires_min_length() {
        let payload = ResetPasswordRequest {
            email: "ada@example.com".into(),
            reset_token: "tok".into(),
            new_password: "2short".into(),
        };
        assert!(validate_payload(&payload).is_err());
    }
}
