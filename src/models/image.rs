use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{DreamError, Result};

pub const MISSING_FIELDS: &str = "Image and dream are required";

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub dream: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Where the portrait comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline `data:<mime>;base64,<payload>`.
    DataUrl { mime: String, bytes: usize },
    /// Hosted `http(s)` URL.
    Remote(String),
}

impl ImageSource {
    pub fn parse(image: &str) -> Result<Self> {
        if let Some(rest) = image.strip_prefix("data:") {
            let (meta, payload) = rest.split_once(',').ok_or_else(|| {
                DreamError::InvalidRequest("Image data URL is missing its payload".into())
            })?;
            let mime = meta.strip_suffix(";base64").ok_or_else(|| {
                DreamError::InvalidRequest("Image data URL must be base64 encoded".into())
            })?;
            if !mime.starts_with("image/") {
                return Err(DreamError::InvalidRequest(format!(
                    "Unsupported image type: {}",
                    mime
                )));
            }
            let decoded = STANDARD
                .decode(payload.trim())
                .map_err(|e| DreamError::InvalidRequest(format!("Invalid image data: {}", e)))?;
            return Ok(ImageSource::DataUrl {
                mime: mime.to_string(),
                bytes: decoded.len(),
            });
        }

        if image.starts_with("https://") || image.starts_with("http://") {
            return Ok(ImageSource::Remote(image.to_string()));
        }

        Err(DreamError::InvalidRequest(
            "Image must be a data URL or an http(s) URL".into(),
        ))
    }
}

/// A request that passed validation.
#[derive(Debug, Clone)]
pub struct DreamRequest {
    pub image: String,
    pub source: ImageSource,
    pub dream: String,
    pub model: Option<String>,
    pub prompt_template: Option<String>,
}

impl GenerateRequest {
    pub fn new(image: impl Into<String>, dream: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            dream: Some(dream.into()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    /// Checks that image and dream are present and the image is usable.
    pub fn validate(self) -> Result<DreamRequest> {
        let image = self.image.unwrap_or_default();
        let dream = self.dream.unwrap_or_default().trim().to_string();
        if image.trim().is_empty() || dream.is_empty() {
            return Err(DreamError::InvalidRequest(MISSING_FIELDS.into()));
        }
        let source = ImageSource::parse(image.trim())?;

        Ok(DreamRequest {
            image: image.trim().to_string(),
            source,
            dream,
            model: self.model.filter(|m| !m.trim().is_empty()),
            prompt_template: self.prompt_template,
        })
    }
}

/// Queue submission acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct FalQueueResponse {
    pub request_id: String,
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FalJobStatus {
    InQueue,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FalStatusResponse {
    pub status: FalJobStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FalImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FalResultResponse {
    #[serde(default)]
    pub images: Vec<FalImage>,
}

impl FalResultResponse {
    pub fn first_image_url(&self) -> Result<String> {
        self.images
            .first()
            .map(|image| image.url.clone())
            .filter(|url| !url.is_empty())
            .ok_or(DreamError::NoImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_image_and_dream() {
        let err = GenerateRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);

        let err = GenerateRequest::new("https://x/p.jpg", "   ")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);
    }

    #[test]
    fn test_validate_trims_dream() {
        let request = GenerateRequest::new("https://x/p.jpg", "  Walking on the moon \n")
            .validate()
            .unwrap();
        assert_eq!(request.dream, "Walking on the moon");
        assert_eq!(request.source, ImageSource::Remote("https://x/p.jpg".into()));
    }

    #[test]
    fn test_data_url() {
        let source = ImageSource::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(
            source,
            ImageSource::DataUrl {
                mime: "image/png".into(),
                bytes: 5
            }
        );
    }

    #[test]
    fn test_rejects_bad_images() {
        assert!(ImageSource::parse("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(ImageSource::parse("data:image/png,raw").is_err());
        assert!(ImageSource::parse("data:image/png;base64,%%%").is_err());
        assert!(ImageSource::parse("/examples/portrait-1.jpg").is_err());
    }

    #[test]
    fn test_request_wire_names() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"image":"https://x/p.jpg","dream":"fly","model":"flux-2-edit","promptTemplate":"Hero {{DREAM}}"}"#,
        )
        .unwrap();
        assert_eq!(request.prompt_template.as_deref(), Some("Hero {{DREAM}}"));

        let response = GenerateResponse {
            image_url: "https://fal.media/out.png".into(),
            prompt: "p".into(),
            model: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["imageUrl"], "https://fal.media/out.png");
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_job_status_decoding() {
        let status: FalStatusResponse =
            serde_json::from_str(r#"{"status":"IN_PROGRESS","logs":[]}"#).unwrap();
        assert_eq!(status.status, FalJobStatus::InProgress);
        let status: FalStatusResponse = serde_json::from_str(r#"{"status":"CANCELLED"}"#).unwrap();
        assert_eq!(status.status, FalJobStatus::Unknown);
    }

    #[test]
    fn test_first_image_url() {
        let result: FalResultResponse =
            serde_json::from_str(r#"{"images":[{"url":"https://a","content_type":"image/png"},{"url":"https://b"}]}"#)
                .unwrap();
        assert_eq!(result.first_image_url().unwrap(), "https://a");

        let empty: FalResultResponse = serde_json::from_str(r#"{"seed":1}"#).unwrap();
        assert!(matches!(empty.first_image_url(), Err(DreamError::NoImage)));
    }
}
