use serde_json::{json, Value};

use super::common::ModelInfo;

/// Image-edit models a dream can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DreamModel {
    #[default]
    Flux2Edit,
    NanoBananaPro,
    SeedreamV4Edit,
}

impl DreamModel {
    pub const ALL: [DreamModel; 3] = [
        DreamModel::Flux2Edit,
        DreamModel::NanoBananaPro,
        DreamModel::SeedreamV4Edit,
    ];

    /// Resolves a client-facing key. Unknown keys fall back to Flux 2.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "nano-banana-pro" => DreamModel::NanoBananaPro,
            "seedream-v4-edit" => DreamModel::SeedreamV4Edit,
            _ => DreamModel::Flux2Edit,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            DreamModel::Flux2Edit => "flux-2-edit",
            DreamModel::NanoBananaPro => "nano-banana-pro",
            DreamModel::SeedreamV4Edit => "seedream-v4-edit",
        }
    }

    /// fal.ai endpoint id, e.g. `fal-ai/flux-2/edit`.
    pub fn endpoint_id(&self) -> &'static str {
        match self {
            DreamModel::Flux2Edit => "fal-ai/flux-2/edit",
            DreamModel::NanoBananaPro => "fal-ai/nano-banana-pro/edit",
            DreamModel::SeedreamV4Edit => "fal-ai/bytedance/seedream/v4/edit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DreamModel::Flux2Edit => "FLUX.2 image edit",
            DreamModel::NanoBananaPro => "Nano Banana Pro image edit",
            DreamModel::SeedreamV4Edit => "ByteDance SeedDream v4 edit, LLM-enhanced prompt",
        }
    }

    /// Whether the prompt comes from the LLM enhancer instead of a template.
    pub fn enhances_prompt(&self) -> bool {
        matches!(self, DreamModel::SeedreamV4Edit)
    }

    /// Model-specific input payload for the fal endpoint.
    pub fn build_input(&self, prompt: &str, image: &str) -> Value {
        match self {
            DreamModel::SeedreamV4Edit => json!({
                "prompt": prompt,
                "image_urls": [image],
                "image_size": "portrait_4_3",
                "num_images": 1,
                "enable_safety_checker": true,
                "enhance_prompt_mode": "standard"
            }),
            DreamModel::Flux2Edit | DreamModel::NanoBananaPro => json!({
                "prompt": prompt,
                "image_urls": [image],
                "guidance_scale": 2.5,
                "num_inference_steps": 28,
                "image_size": "portrait_4_3",
                "num_images": 1,
                "acceleration": "regular",
                "enable_safety_checker": true,
                "output_format": "png"
            }),
        }
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            key: self.key().to_string(),
            endpoint: self.endpoint_id().to_string(),
            description: self.description().to_string(),
            enhances_prompt: self.enhances_prompt(),
        }
    }
}

pub fn supported_models() -> Vec<ModelInfo> {
    DreamModel::ALL.iter().map(DreamModel::info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_resolution() {
        assert_eq!(DreamModel::from_key("flux-2-edit"), DreamModel::Flux2Edit);
        assert_eq!(DreamModel::from_key("nano-banana-pro"), DreamModel::NanoBananaPro);
        assert_eq!(DreamModel::from_key("seedream-v4-edit"), DreamModel::SeedreamV4Edit);
        assert_eq!(DreamModel::from_key("dall-e-3"), DreamModel::Flux2Edit);
        assert_eq!(DreamModel::from_key(""), DreamModel::Flux2Edit);
    }

    #[test]
    fn test_keys_round_trip_through_catalog() {
        for model in DreamModel::ALL {
            assert_eq!(DreamModel::from_key(model.key()), model);
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(DreamModel::Flux2Edit.endpoint_id(), "fal-ai/flux-2/edit");
        assert_eq!(
            DreamModel::SeedreamV4Edit.endpoint_id(),
            "fal-ai/bytedance/seedream/v4/edit"
        );
    }

    #[test]
    fn test_seedream_input() {
        let input = DreamModel::SeedreamV4Edit.build_input("a prompt", "https://img/x.png");
        assert_eq!(input["prompt"], "a prompt");
        assert_eq!(input["image_urls"][0], "https://img/x.png");
        assert_eq!(input["enhance_prompt_mode"], "standard");
        assert!(input.get("guidance_scale").is_none());
    }

    #[test]
    fn test_flux_input() {
        let input = DreamModel::Flux2Edit.build_input("p", "data:image/png;base64,AAAA");
        assert_eq!(input["guidance_scale"], 2.5);
        assert_eq!(input["num_inference_steps"], 28);
        assert_eq!(input["output_format"], "png");
        assert_eq!(input["image_size"], "portrait_4_3");
    }

    #[test]
    fn test_only_seedream_enhances() {
        let enhancing: Vec<_> = supported_models()
            .into_iter()
            .filter(|info| info.enhances_prompt)
            .map(|info| info.key)
            .collect();
        assert_eq!(enhancing, vec!["seedream-v4-edit".to_string()]);
    }
}
