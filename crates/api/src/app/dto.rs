use serde::Serialize;

/// Body of a `202 Accepted` from the ingestion route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplyAccepted {
    pub status: &'static str,
}

impl ReplyAccepted {
    pub const fn queued() -> Self {
        Self { status: "queued" }
    }
}
