use std::sync::Arc;

use crate::{
    config::Config,
    error::{DreamError, Result},
    fal::{FalClient, ImageEditor},
    logger,
    models::{DreamModel, GenerateRequest, GenerateResponse, ImageSource},
    openrouter::{self, PromptEnhancer, TextClient},
    prompt,
};

/// Turns validated dream requests into edited images.
#[derive(Clone)]
pub struct DreamGenerator {
    editor: Option<Arc<dyn ImageEditor>>,
    enhancer: Option<Arc<dyn PromptEnhancer>>,
    default_model: DreamModel,
}

impl DreamGenerator {
    pub fn new(default_model: DreamModel) -> Self {
        Self {
            editor: None,
            enhancer: None,
            default_model,
        }
    }

    /// Wires up fal.ai and OpenRouter from config. Either may be absent.
    pub fn from_config(config: &Config) -> Self {
        let mut generator = Self::new(config.default_model);

        match FalClient::new(config.fal.clone()) {
            Ok(client) => generator = generator.with_editor(Arc::new(client)),
            Err(e) => log::warn!("fal.ai client unavailable: {}", e),
        }
        match TextClient::new(config.openrouter.clone()) {
            Ok(client) => generator = generator.with_enhancer(Arc::new(client)),
            Err(e) => log::warn!("Prompt enhancement disabled: {}", e),
        }

        generator
    }

    pub fn with_editor(mut self, editor: Arc<dyn ImageEditor>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn with_enhancer(mut self, enhancer: Arc<dyn PromptEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn default_model(&self) -> DreamModel {
        self.default_model
    }

    pub fn is_ready(&self) -> bool {
        self.editor.is_some()
    }

    pub async fn build_prompt(
        &self,
        model: DreamModel,
        dream: &str,
        template: Option<&str>,
    ) -> String {
        if model.enhances_prompt() {
            log::info!("Enhancing prompt with LLM for {}", model.key());
            openrouter::enhance_or_fallback(self.enhancer.as_deref(), dream).await
        } else {
            prompt::render(dream, template)
        }
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let request = request.validate()?;
        let editor = self.editor.as_ref().ok_or(DreamError::MissingApiKey)?;
        let _timer = logger::timer("dream generation");
        match &request.source {
            ImageSource::DataUrl { mime, bytes } => {
                log::debug!("Portrait: inline {} ({} bytes)", mime, bytes)
            }
            ImageSource::Remote(url) => log::debug!("Portrait: {}", url),
        }

        let model = request
            .model
            .as_deref()
            .map(DreamModel::from_key)
            .unwrap_or(self.default_model);

        let prompt = self
            .build_prompt(model, &request.dream, request.prompt_template.as_deref())
            .await;
        log::debug!(
            "Sending to {} with prompt: {}",
            model.endpoint_id(),
            prompt::preview(&prompt, 200)
        );

        let input = model.build_input(&prompt, &request.image);
        let image_url = editor.edit(model.endpoint_id(), &input).await?;
        log::info!("Image generated successfully with {}", model.key());

        Ok(GenerateResponse {
            image_url,
            prompt,
            model: Some(model.key().to_string()),
        })
    }
}
