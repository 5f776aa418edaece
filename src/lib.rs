//! Dreamizer: portrait + dream phrase in, edited "living the dream" photo out.
//!
//! Image synthesis is delegated to fal.ai image-edit models. Prompts come from
//! a `{{DREAM}}` template, or from an OpenRouter chat completion for models
//! that benefit from a richer description.

pub mod config;
pub mod error;
pub mod fal;
pub mod generate;
pub mod logger;
pub mod models;
pub mod openrouter;
pub mod prompt;
#[cfg(feature = "server")]
pub mod server;

pub use config::{Config, DispatchMode, FalConfig, OpenRouterConfig};
pub use error::{DreamError, Result};
pub use fal::{FalClient, ImageEditor};
pub use generate::DreamGenerator;
pub use models::*;
pub use openrouter::{EnhancementStyle, PromptEnhancer, TextClient};
