use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role carried in a bearer token.
///
/// Roles are opaque strings at this layer. The only role the reply pipeline
/// itself grants is [`Role::SYSTEM`], which marks the worker's own identity
/// when it calls back into the content API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const SYSTEM: Role = Role(Cow::Borrowed("system"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
