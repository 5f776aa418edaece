use super::auth_header;
use crate::{
    config::FalConfig,
    error::{DreamError, Result},
    models::FalResultResponse,
};
use reqwest::Client;
use serde_json::Value;

/// Single blocking call against `fal.run`.
#[derive(Clone)]
pub struct SyncClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SyncClient {
    pub fn new(client: Client, api_key: String, config: &FalConfig) -> Self {
        Self {
            client,
            api_key,
            base_url: config.sync_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn run(&self, endpoint_id: &str, input: &Value) -> Result<FalResultResponse> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint_id))
            .header("Authorization", auth_header(&self.api_key))
            .json(input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("fal.ai returned {}: {}", status, message);
            return Err(DreamError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/fal-ai/flux-2/edit");
                then.status(422).body("image_urls: invalid");
            })
            .await;

        let config = FalConfig::new().with_base_url(format!("{}/", server.base_url()));
        let client = SyncClient::new(Client::new(), "k".to_string(), &config);
        let err = client
            .run("fal-ai/flux-2/edit", &json!({}))
            .await
            .unwrap_err();

        match err {
            DreamError::ApiError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "image_urls: invalid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
