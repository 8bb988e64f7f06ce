use crate::models::ErrorEnvelope;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("{provider} API error ({status}): {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} does not support {operation}")]
    UnsupportedOperation {
        provider: String,
        operation: &'static str,
    },

    #[error("No AI provider configured")]
    NoProviderConfigured,

    #[error("Network error: {0}")]
    Http(reqwest::Error),

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GenerationError {
    /// Build a provider error from a non-2xx body, preferring the vendor's own message.
    pub fn from_vendor_body(provider: &str, status: u16, body: &str) -> Self {
        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("{} request failed with status {}", provider, status));
        GenerationError::Provider {
            provider: provider.to_string(),
            status,
            message,
        }
    }

    pub fn unsupported(provider: &str, operation: &'static str) -> Self {
        GenerationError::UnsupportedOperation {
            provider: provider.to_string(),
            operation,
        }
    }
}

// Gemini carries its key in the query string, so request URLs stay out of errors.
impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Http(err.without_url())
    }
}

/// Pull the message out of `{"error":{"message":..}}` or `{"error":".."}`.
fn extract_error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    envelope
        .message()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
