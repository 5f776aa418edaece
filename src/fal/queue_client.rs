use super::auth_header;
use crate::{
    config::FalConfig,
    error::{DreamError, Result},
    models::{FalJobStatus, FalQueueResponse, FalResultResponse, FalStatusResponse},
};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Submit + poll against the fal.ai queue API.
#[derive(Clone)]
pub struct QueueClient {
    client: Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_attempts: u32,
}

impl QueueClient {
    pub fn new(client: Client, api_key: String, config: &FalConfig) -> Self {
        Self {
            client,
            api_key,
            base_url: config.queue_url.trim_end_matches('/').to_string(),
            poll_interval: config.poll_interval,
            max_attempts: config.max_attempts,
        }
    }

    /// Submits the job, waits for it and fetches the result.
    ///
    /// Sleeps one interval before every status check and gives up after
    /// `max_attempts` checks.
    pub async fn run(&self, endpoint_id: &str, input: &Value) -> Result<FalResultResponse> {
        let start = Instant::now();
        let ack = self.submit(endpoint_id, input).await?;
        log::debug!("Submitted fal.ai request {}", ack.request_id);

        let status_url = ack
            .status_url
            .clone()
            .unwrap_or_else(|| self.request_url(endpoint_id, &ack.request_id, true));
        let response_url = ack
            .response_url
            .clone()
            .unwrap_or_else(|| self.request_url(endpoint_id, &ack.request_id, false));

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;

            match self.status(&status_url).await? {
                FalJobStatus::Completed => {
                    log::info!(
                        "fal.ai request {} completed after {} checks ({}ms)",
                        ack.request_id,
                        attempt,
                        start.elapsed().as_millis()
                    );
                    return self.result(&response_url).await;
                }
                FalJobStatus::Failed => {
                    log::error!("fal.ai request {} failed", ack.request_id);
                    return Err(DreamError::GenerationFailed);
                }
                status => {
                    if status == FalJobStatus::InProgress {
                        log::debug!("Generation in progress... ({}/{})", attempt, self.max_attempts);
                    } else {
                        log::debug!(
                            "fal.ai request {} is {:?} ({}/{})",
                            ack.request_id,
                            status,
                            attempt,
                            self.max_attempts
                        );
                    }
                }
            }
        }

        log::warn!(
            "fal.ai request {} still pending after {} checks",
            ack.request_id,
            self.max_attempts
        );
        Err(DreamError::Timeout {
            attempts: self.max_attempts,
            interval: self.poll_interval,
        })
    }

    pub async fn submit(&self, endpoint_id: &str, input: &Value) -> Result<FalQueueResponse> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint_id))
            .header("Authorization", auth_header(&self.api_key))
            .json(input)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("fal.ai queue submission rejected: {}", error_text);
            return Err(DreamError::SubmitError(error_text));
        }

        Ok(response.json().await?)
    }

    pub async fn status(&self, status_url: &str) -> Result<FalJobStatus> {
        let response = self
            .client
            .get(status_url)
            .header("Authorization", auth_header(&self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            log::error!("fal.ai status check returned {}", response.status());
            return Err(DreamError::StatusError);
        }

        let status: FalStatusResponse = response.json().await?;
        Ok(status.status)
    }

    pub async fn result(&self, response_url: &str) -> Result<FalResultResponse> {
        let response = self
            .client
            .get(response_url)
            .header("Authorization", auth_header(&self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            log::error!("fal.ai result fetch returned {}", response.status());
            return Err(DreamError::ResultError);
        }

        Ok(response.json().await?)
    }

    fn request_url(&self, endpoint_id: &str, request_id: &str, status: bool) -> String {
        let url = format!("{}/{}/requests/{}", self.base_url, endpoint_id, request_id);
        if status {
            format!("{}/status", url)
        } else {
            url
        }
    }
}
