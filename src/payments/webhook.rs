use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Header the provider sends the payload signature in.
pub const SIGNATURE_HEADER: &str = "x-squad-encrypted-body";

/// HMAC-SHA512 of the exact raw body, uppercase hex, keyed by the shared
/// secret.
pub fn signature(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode_upper(mac.finalize().into_bytes())
}

/// Constant-time verification of a provider signature. An undecodable
/// header is simply invalid; hex case does not matter.
pub fn verify(secret: &str, body: &[u8], provided_hex: &str) -> bool {
    let Ok(provided) = hex::decode(provided_hex) else {
        return false;
    };
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "squad-test-secret";
    const BODY: &[u8] = br#"{"transaction_ref":"SQD123456","amount":500000,"status":"success"}"#;
    // Independently computed HMAC-SHA512 of BODY under SECRET.
    const EXPECTED: &str = "E100004F1B74BE0BF062396625FE98928AA88D597F33DD1F02818C827F4ABADF46AEC0A6A62E0062436D5AEF56A0D52E7DE6B088B1F9FA83A2F57B7779F3207D";

    #[test]
    fn signature_matches_known_vector() {
        assert_eq!(signature(SECRET, BODY), EXPECTED);
    }

    #[test]
    fn verify_accepts_valid_signature() {
        assert!(verify(SECRET, BODY, EXPECTED));
    }

    #[test]
    fn verify_is_case_insensitive_on_hex() {
        assert!(verify(SECRET, BODY, &EXPECTED.to_lowercase()));
    }

    #[test]
    fn single_byte_mutation_invalidates() {
        let mut mutated = BODY.to_vec();
        mutated[10] ^= 0x01;
        assert!(!verify(SECRET, &mutated, EXPECTED));
    }

    #[test]
    fn wrong_secret_invalidates() {
        assert!(!verify("some-other-secret", BODY, EXPECTED));
    }

    #[test]
    fn undecodable_header_is_invalid() {
        assert!(!verify(SECRET, BODY, "not-hex-at-all"));
        assert!(!verify(SECRET, BODY, ""));
    }

    #[test]
    fn truncated_signature_is_invalid() {
        assert!(!verify(SECRET, BODY, &EXPECTED[..64]));
    }
}
