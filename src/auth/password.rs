use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Fails closed: a corrupt or mismatched hash is a plain `false`.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        error!("argon2 parse hash error");
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// A reset token pair: `token` goes to the user out-of-band, only `hash`
/// is ever persisted.
pub struct ResetToken {
    pub token: String,
    pub hash: String,
}

pub fn generate_reset_token() -> anyhow::Result<ResetToken> {
    let token = random_token(32);
    let hash = hash_password(&token)?;
    Ok(ResetToken { token, hash })
}

/// Expiry is the caller's to check.
pub fn validate_reset_token(stored_hash: &str, presented: &str) -> bool {
    verify_password(presented, stored_hash)
}

/// Full reset-token decision: a token is usable only when one is stored,
/// its window has not lapsed, and the presented value matches the hash.
pub fn reset_token_usable(
    stored_hash: Option<&str>,
    expiry: Option<time::OffsetDateTime>,
    presented: &str,
    now: time::OffsetDateTime,
) -> bool {
    match (stored_hash, expiry) {
        (Some(hash), Some(expiry)) => expiry > now && validate_reset_token(hash, presented),
        _ => false,
    }
}

pub fn generate_verification_token() -> String {
    random_token(64)
}

/// Unsalted digest of the verification token for at-rest storage; the
/// verify-email flow has to look the user up by token, which rules out a
/// salted hash.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_fails_closed_on_malformed_hash() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
    }

    #[test]
    fn reset_token_roundtrip() {
        let reset = generate_reset_token().expect("token generation");
        assert!(validate_reset_token(&reset.hash, &reset.token));
        assert!(!validate_reset_token(&reset.hash, "some-other-token"));
    }

    #[test]
    fn reset_token_is_opaque_and_never_equal_to_its_hash() {
        let reset = generate_reset_token().expect("token generation");
        assert_eq!(reset.token.len(), 32);
        assert_ne!(reset.token, reset.hash);
    }

    #[test]
    fn reset_token_rejected_past_expiry_even_if_valid() {
        use time::{Duration, OffsetDateTime};

        let reset = generate_reset_token().expect("token generation");
        let now = OffsetDateTime::now_utc();
        let live = now + Duration::minutes(30);
        let lapsed = now - Duration::minutes(1);

        assert!(reset_token_usable(
            Some(&reset.hash),
            Some(live),
            &reset.token,
            now
        ));
        assert!(!reset_token_usable(
            Some(&reset.hash),
            Some(lapsed),
            &reset.token,
            now
        ));
        // no token issued at all
        assert!(!reset_token_usable(None, None, &reset.token, now));
    }

    #[test]
    fn verification_tokens_are_long_and_unique() {
        let a = generate_verification_token();
        let b = generate_verification_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn token_digest_is_deterministic_and_distinct() {
        let a = generate_verification_token();
        let b = generate_verification_token();
        assert_eq!(token_digest(&a), token_digest(&a));
        assert_ne!(token_digest(&a), token_digest(&b));
        // 32-byte digest as hex
        assert_eq!(token_digest(&a).len(), 64);
    }
}
