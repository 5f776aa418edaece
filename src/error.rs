use std::time::Duration;

/// Errors surfaced while turning a dream into an image.
#[derive(Debug, thiserror::Error)]
pub enum DreamError {
    /// Client sent an unusable payload.
    #[error("{0}")]
    InvalidRequest(String),

    /// Request body over the configured payload limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// No fal.ai credentials available.
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The queue rejected the submission. Carries the upstream body.
    #[error("Failed to submit request: {0}")]
    SubmitError(String),

    #[error("Failed to check status")]
    StatusError,

    #[error("Failed to get result")]
    ResultError,

    /// The remote model reported a failed job.
    #[error("Image generation failed")]
    GenerationFailed,

    /// Poll budget exhausted before the job completed.
    #[error("Request timed out")]
    Timeout { attempts: u32, interval: Duration },

    #[error("No image in response")]
    NoImage,

    /// Non-2xx answer from a synchronous endpoint.
    #[error("Remote model error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Prompt enhancement error: {0}")]
    EnhancementError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DreamError {
    /// HTTP status the server answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DreamError::InvalidRequest(_) => 400,
            DreamError::PayloadTooLarge => 413,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, DreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DreamError::InvalidRequest("bad".into()).status_code(), 400);
        assert_eq!(DreamError::PayloadTooLarge.status_code(), 413);
        assert_eq!(DreamError::MissingApiKey.status_code(), 500);
        assert_eq!(DreamError::GenerationFailed.status_code(), 500);
        assert_eq!(DreamError::NoImage.status_code(), 500);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DreamError::MissingApiKey.to_string(), "API key not configured");
        assert_eq!(
            DreamError::SubmitError("quota exceeded".into()).to_string(),
            "Failed to submit request: quota exceeded"
        );
        let timeout = DreamError::Timeout {
            attempts: 120,
            interval: Duration::from_secs(1),
        };
        assert_eq!(timeout.to_string(), "Request timed out");
        assert_eq!(
            DreamError::ApiError {
                status: 422,
                message: "bad image".into()
            }
            .to_string(),
            "Remote model error: 422 - bad image"
        );
    }
}
