//! `autoreply-auth`: identity boundary for the reply pipeline.
//!
//! Mints the system credential the reply worker presents to the content API
//! and verifies bearer tokens on the ingestion route. Decoupled from HTTP.

pub mod actor;
pub mod claims;
pub mod issuer;
pub mod roles;
pub mod validator;

pub use actor::{SystemActor, SystemCredential};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use issuer::{Hs256SystemIssuer, IssueError, SystemIdentityIssuer};
pub use roles::Role;
pub use validator::{Hs256JwtValidator, JwtValidator};
