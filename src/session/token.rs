//! Client-side token expiry checks
//!
//! The signature is never verified here; the backend remains the authority.
//! Only the `exp` claim of JWT-shaped tokens is read. Tokens that do not
//! decode as JWTs are treated as opaque and never expire client-side.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Expiry instant carried by the token, if any
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}

pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match expiry(token) {
        Some(exp) => exp <= now,
        None => false,
    }
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    /// Signed HS256 token expiring `offset_secs` from now
    pub(crate) fn jwt_expiring_in(offset_secs: i64) -> String {
        let claims = Claims {
            sub: "1".into(),
            exp: Utc::now().timestamp() + offset_secs,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn test_future_token_is_valid() {
        assert!(!is_expired(&jwt_expiring_in(3600)));
    }

    #[test]
    fn test_past_token_is_expired() {
        assert!(is_expired(&jwt_expiring_in(-60)));
    }

    #[test]
    fn test_opaque_token_never_expires() {
        assert!(expiry("3f2a9c-opaque").is_none());
        assert!(!is_expired("3f2a9c-opaque"));
    }

    #[test]
    fn test_expiry_boundary() {
        let token = jwt_expiring_in(0);
        let exp = expiry(&token).unwrap();
        assert!(is_expired_at(&token, exp));
        assert!(!is_expired_at(&token, exp - chrono::Duration::seconds(1)));
    }
}
