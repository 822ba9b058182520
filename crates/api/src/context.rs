use autoreply_auth::JwtClaims;

/// Principal context for a request (the authenticated subject).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    subject: String,
}

impl PrincipalContext {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl From<JwtClaims> for PrincipalContext {
    fn from(claims: JwtClaims) -> Self {
        Self::new(claims.sub)
    }
}
