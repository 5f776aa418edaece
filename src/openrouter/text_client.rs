use super::{EnhancementStyle, PromptEnhancer};
use crate::{
    config::OpenRouterConfig,
    error::{DreamError, Result},
    models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
};
use async_trait::async_trait;
use reqwest::Client;

const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 200;

/// OpenAI-compatible chat completion client used for prompt enhancement.
#[derive(Clone)]
pub struct TextClient {
    client: Client,
    api_key: String,
    config: OpenRouterConfig,
    style: EnhancementStyle,
}

impl TextClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| DreamError::ConfigError("OPENROUTER_API_KEY not configured".into()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            config,
            style: EnhancementStyle::default(),
        })
    }

    pub fn with_style(mut self, style: EnhancementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> EnhancementStyle {
        self.style
    }

    fn build_request(&self, dream: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(self.style.system_prompt()),
                ChatMessage::user(self.style.user_prompt(dream)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl PromptEnhancer for TextClient {
    async fn enhance(&self, dream: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        log::info!("Enhancing prompt with {} ({:?})", self.config.model, self.style);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&self.build_request(dream))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DreamError::EnhancementError(format!(
                "OpenRouter returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .first_content()
            .ok_or_else(|| DreamError::EnhancementError("Empty completion".into()))
    }
}
