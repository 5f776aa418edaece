pub mod text_client;

use crate::{error::Result, prompt};
use async_trait::async_trait;

pub use text_client::TextClient;

/// Rewrites a dream phrase into a richer image prompt.
#[async_trait]
pub trait PromptEnhancer: Send + Sync {
    async fn enhance(&self, dream: &str) -> Result<String>;
}

/// Instruction set sent to the chat model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnhancementStyle {
    /// Future reality of the character fulfilling the dream.
    #[default]
    Inspirational,
    /// Single peak moment of success, kept to a medium shot.
    PeakMoment,
}

impl EnhancementStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inspirational" => Some(EnhancementStyle::Inspirational),
            "peak-moment" | "peak" => Some(EnhancementStyle::PeakMoment),
            _ => None,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            EnhancementStyle::Inspirational => "You are a creative prompt engineer specializing in image generation. Create vivid, detailed prompts that describe inspirational images.",
            EnhancementStyle::PeakMoment => "You are a creative prompt engineer specializing in image generation. Focus on peak moments of success and joy. Create vivid, detailed prompts that capture the essence of achievement and positive energy, while maintaining a medium shot composition.",
        }
    }

    pub fn user_prompt(&self, dream: &str) -> String {
        match self {
            EnhancementStyle::Inspirational => format!(
                "Describe an inspirational image of the future reality of a character fulfilling their dream: \"{}\". Use a medium shot composition. Be specific about the scene, atmosphere, lighting, emotions, and visual details. Make it vivid and cinematic.",
                dream
            ),
            EnhancementStyle::PeakMoment => format!(
                "Describe a peak moment of success in this dream: \"{}\". Focus on a specific situation that symbolizes success the most - a moment that delivers success and joy, with good vibes and energy. Describe vibrant details about the character's expression, emotions, and immediate surroundings, but keep it focused on a medium shot composition. Don't describe the entire environment in detail as that would create a long shot. Focus on the character and their immediate success moment.",
                dream
            ),
        }
    }
}

/// Enhanced prompt, or the default template when enhancement is unavailable.
pub async fn enhance_or_fallback(enhancer: Option<&dyn PromptEnhancer>, dream: &str) -> String {
    let Some(enhancer) = enhancer else {
        log::debug!("No prompt enhancer configured, using basic prompt");
        return prompt::fallback(dream);
    };

    match enhancer.enhance(dream).await {
        Ok(enhanced) => {
            log::info!("Enhanced prompt: {}", prompt::preview(&enhanced, 150));
            enhanced
        }
        Err(e) => {
            log::warn!("Prompt enhancement failed, using basic prompt: {}", e);
            prompt::fallback(dream)
        }
    }
}
