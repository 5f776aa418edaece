pub mod queue_client;
pub mod sync_client;

use crate::{
    config::{DispatchMode, FalConfig},
    error::{DreamError, Result},
};
use async_trait::async_trait;
use serde_json::Value;

pub use queue_client::QueueClient;
pub use sync_client::SyncClient;

/// Something that turns a model input into a hosted image URL.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    async fn edit(&self, endpoint_id: &str, input: &Value) -> Result<String>;
}

/// fal.ai client, dispatching through the queue or the sync endpoint.
#[derive(Clone)]
pub struct FalClient {
    mode: DispatchMode,
    queue_client: QueueClient,
    sync_client: SyncClient,
}

impl FalClient {
    pub fn new(config: FalConfig) -> Result<Self> {
        if !config.has_credentials() {
            return Err(DreamError::MissingApiKey);
        }
        let api_key = config.api_key.clone().ok_or(DreamError::MissingApiKey)?;
        let client = reqwest::Client::new();

        Ok(Self {
            mode: config.mode,
            queue_client: QueueClient::new(client.clone(), api_key.clone(), &config),
            sync_client: SyncClient::new(client, api_key, &config),
        })
    }
}

#[async_trait]
impl ImageEditor for FalClient {
    async fn edit(&self, endpoint_id: &str, input: &Value) -> Result<String> {
        log::info!(
            "Generating image with model: {} ({} mode)",
            endpoint_id,
            self.mode.as_str()
        );

        let result = match self.mode {
            DispatchMode::Queue => self.queue_client.run(endpoint_id, input).await?,
            DispatchMode::Sync => self.sync_client.run(endpoint_id, input).await?,
        };

        result.first_image_url()
    }
}

fn auth_header(api_key: &str) -> String {
    format!("Key {}", api_key)
}
