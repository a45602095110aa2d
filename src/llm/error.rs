use serde_json::Value;

pub const RATE_LIMIT_MESSAGE: &str =
    "API Rate Limit Exceeded. You've used up your current quota. Please check your plan and billing details.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StudioError {
    #[error("API Rate Limit Exceeded. You've used up your current quota. Please check your plan and billing details.")]
    RateLimited,
    #[error("Generation blocked. Reason: {reason}")]
    Blocked { reason: String },
    #[error("{0}")]
    EmptyResult(String),
    #[error("{message}")]
    Api { message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("The model returned an unreadable response: {0}")]
    InvalidResponse(String),
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("Unsupported file type: {0}. Please provide an image.")]
    UnsupportedMedia(String),
    #[error("{0}")]
    Io(String),
}

impl StudioError {
    /// The single line shown to the user when `context` fails.
    pub fn user_message(&self, context: &str) -> String {
        match self {
            StudioError::RateLimited => RATE_LIMIT_MESSAGE.to_string(),
            StudioError::Network(detail) if detail.trim().is_empty() => {
                format!("An unexpected error occurred during {context}.")
            }
            other => format!("An error occurred during {context}: {other}"),
        }
    }
}

/// Maps an error body from the generation API onto the error taxonomy.
///
/// Structured `{"error": {...}}` payloads are inspected for quota
/// exhaustion and a message; anything else is surfaced as raw text.
pub fn classify_api_error(body: &str) -> StudioError {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return StudioError::Api {
            message: "An unexpected error occurred.".to_string(),
        };
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return StudioError::Api {
            message: trimmed.to_string(),
        };
    };

    let Some(error) = value.get("error").filter(|error| error.is_object()) else {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string());
        return StudioError::Api { message };
    };

    let status = error.get("status").and_then(Value::as_str);
    let code = error.get("code").and_then(Value::as_i64);
    if status == Some("RESOURCE_EXHAUSTED") || code == Some(429) {
        return StudioError::RateLimited;
    }

    if let Some(message) = error
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
    {
        return StudioError::Api {
            message: format!("AI Error: {message}"),
        };
    }

    StudioError::Api {
        message: format!("An API error occurred: {}", status.unwrap_or("Unknown")),
    }
}
