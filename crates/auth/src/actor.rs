use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Privileged identity the reply worker acts as when it posts replies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemActor {
    subject: Cow<'static, str>,
}

impl SystemActor {
    /// Subject the content API recognizes as the system account.
    pub const WELL_KNOWN_SUBJECT: &'static str = "system";

    /// The fixed actor used by the reply queue.
    pub const fn well_known() -> Self {
        Self {
            subject: Cow::Borrowed(Self::WELL_KNOWN_SUBJECT),
        }
    }

    pub fn new(subject: impl Into<Cow<'static, str>>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl Default for SystemActor {
    fn default() -> Self {
        Self::well_known()
    }
}

/// Bearer credential minted for a [`SystemActor`].
///
/// Immutable after issuance and safe to share across tasks. `Debug` never
/// prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct SystemCredential(String);

impl SystemCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl core::fmt::Debug for SystemCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SystemCredential").field(&"<redacted>").finish()
    }
}
