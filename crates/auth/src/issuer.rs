//! System identity issuance.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use thiserror::Error;

use crate::{JwtClaims, Role, SystemActor, SystemCredential};

/// Default issuer name stamped into minted tokens.
pub const DEFAULT_ISSUER: &str = "autoreply";

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("credential lifetime must be positive and representable")]
    InvalidTtl,

    #[error("failed to encode token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Mints bearer credentials identifying a privileged system actor.
pub trait SystemIdentityIssuer: Send + Sync {
    fn issue(&self, actor: &SystemActor) -> Result<SystemCredential, IssueError>;
}

/// HS256 issuer sharing its secret with the content API.
#[derive(Clone)]
pub struct Hs256SystemIssuer {
    encoding_key: EncodingKey,
    secret_is_empty: bool,
    ttl: Duration,
}

impl Hs256SystemIssuer {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            secret_is_empty: secret.is_empty(),
            ttl: Duration::days(365),
        }
    }

    /// Lifetime of minted credentials. The queue mints once at startup, so
    /// this bounds how long a process can run before its posts are refused.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl SystemIdentityIssuer for Hs256SystemIssuer {
    fn issue(&self, actor: &SystemActor) -> Result<SystemCredential, IssueError> {
        if self.secret_is_empty {
            return Err(IssueError::EmptySecret);
        }
        if self.ttl <= Duration::zero() {
            return Err(IssueError::InvalidTtl);
        }

        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or(IssueError::InvalidTtl)?;
        let claims = JwtClaims {
            sub: actor.subject().to_string(),
            roles: vec![Role::SYSTEM],
            issuer: DEFAULT_ISSUER.to_string(),
            issued_at: now,
            expires_at,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        tracing::debug!(subject = actor.subject(), expires_at = %claims.expires_at, "minted system credential");
        Ok(SystemCredential::new(token))
    }
}
