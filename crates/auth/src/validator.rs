//! Bearer token verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::{JwtClaims, TokenValidationError, validate_claims};

/// Decodes and verifies a bearer token into claims.
pub trait JwtValidator: Send + Sync + 'static {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HS256 validator.
///
/// `jsonwebtoken` checks the signature; the time window is checked by
/// [`validate_claims`] against the caller-supplied clock.
#[derive(Clone)]
pub struct Hs256JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hs256SystemIssuer, SystemActor, SystemIdentityIssuer};

    #[test]
    fn wrong_secret_is_rejected() {
        let cred = Hs256SystemIssuer::new(b"secret1").issue(&SystemActor::well_known()).unwrap();

        let err = Hs256JwtValidator::new(b"secret2".to_vec())
            .validate(cred.token(), Utc::now())
            .unwrap_err();

        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Hs256JwtValidator::new(b"s".to_vec())
            .validate("not-a-jwt", Utc::now())
            .unwrap_err();
        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn expired_token_is_rejected_against_supplied_clock() {
        let cred = Hs256SystemIssuer::new(b"s")
            .with_ttl(chrono::Duration::minutes(1))
            .issue(&SystemActor::well_known())
            .unwrap();

        let later = Utc::now() + chrono::Duration::minutes(5);
        let err = Hs256JwtValidator::new(b"s".to_vec())
            .validate(cred.token(), later)
            .unwrap_err();
        assert_eq!(err, TokenValidationError::Expired);
    }
}
