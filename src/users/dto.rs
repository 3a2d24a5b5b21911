use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::users::repo::User;

/// Display-safe user projection. Password and token fields stay behind.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            profile_picture: u.profile_picture,
            location: u.location,
            is_verified: u.is_verified,
            created_at: u.created_at,
        }
    }
}

/// Full profile view: public fields plus the follow graph.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 20))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub location: Option<String>,
    #[validate(url)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserSearchQuery {
    #[validate(length(min = 1))]
    pub term: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            profile_picture: None,
            location: None,
            is_verified: true,
            verify_email_token_digest: Some("digest".into()),
            verify_email_token_expiry: None,
            reset_token_hash: Some("reset-hash".into()),
            reset_token_expiry: None,
            refresh_token: Some("refresh".into()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn public_user_never_serializes_secrets() {
        let public: PublicUser = sample_user().into();
        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(!json.contains("reset-hash"));
        assert!(!json.contains("refresh"));
        assert!(!json.contains("digest"));
    }

    #[test]
    fn profile_flattens_public_fields() {
        let profile = UserProfile {
            user: sample_user().into(),
            followers: vec![],
            following: vec![],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["username"], "ada");
        assert!(json["followers"].is_array());
    }
}
