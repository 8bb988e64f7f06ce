use std::fmt;
use tracing::{info_span, Span};
use uuid::Uuid;

/// Correlates one provider call across our logs and the vendor's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn span(&self, provider: &str, operation: &str) -> Span {
        info_span!(
            "provider_call",
            request_id = %self.0,
            provider = %provider,
            operation = %operation
        )
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
