use std::env;
use std::time::Duration;

use crate::models::DreamModel;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_MAX_PAYLOAD_MB: usize = 20;

pub const FAL_QUEUE_URL: &str = "https://queue.fal.run";
pub const FAL_SYNC_URL: &str = "https://fal.run";
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

/// Value shipped in the sample `.env.local`; treated as "no key".
const FAL_KEY_PLACEHOLDER: &str = "your_fal_api_key_here";

/// How requests reach the fal.ai model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Submit to the queue, then poll status until done.
    Queue,
    /// Single blocking call to `fal.run`.
    Sync,
}

impl DispatchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "queue" | "queued" => Some(DispatchMode::Queue),
            "sync" | "synchronous" => Some(DispatchMode::Sync),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Queue => "queue",
            DispatchMode::Sync => "sync",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FalConfig {
    pub api_key: Option<String>,
    pub mode: DispatchMode,
    pub queue_url: String,
    pub sync_url: String,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub referer: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub default_model: DreamModel,
    pub max_payload_mb: usize,
    pub fal: FalConfig,
    pub openrouter: OpenRouterConfig,
}

impl Default for FalConfig {
    fn default() -> Self {
        FalConfig {
            api_key: None,
            mode: DispatchMode::Queue,
            queue_url: FAL_QUEUE_URL.to_string(),
            sync_url: FAL_SYNC_URL.to_string(),
            poll_interval: Duration::from_secs(1),
            max_attempts: 120,
        }
    }
}

impl FalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. `FAL_KEY` wins over `FAL_API_KEY`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_key = var("FAL_KEY")
            .filter(|key| usable_key(key))
            .or_else(|| var("FAL_API_KEY").filter(|key| usable_key(key)));
        let mode = var("FAL_MODE")
            .and_then(|mode| DispatchMode::parse(&mode))
            .unwrap_or(defaults.mode);
        let poll_interval = var("FAL_POLL_INTERVAL_MS")
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let max_attempts = var("FAL_MAX_ATTEMPTS")
            .and_then(|n| n.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults.max_attempts);

        FalConfig {
            api_key,
            mode,
            poll_interval,
            max_attempts,
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Points both the queue and the sync endpoints at `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.queue_url = base_url.clone();
        self.sync_url = base_url;
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_attempts = max_attempts;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().map_or(false, usable_key)
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        OpenRouterConfig {
            api_key: None,
            base_url: OPENROUTER_URL.to_string(),
            model: "openai/gpt-4o".to_string(),
            referer: "https://dreemz.ai".to_string(),
            title: "Dreemizer".to_string(),
        }
    }
}

impl OpenRouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        OpenRouterConfig {
            api_key: var("OPENROUTER_API_KEY").filter(|key| !key.trim().is_empty()),
            model: var("OPENROUTER_MODEL").unwrap_or(defaults.model.clone()),
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: None,
            default_model: DreamModel::SeedreamV4Edit,
            max_payload_mb: DEFAULT_MAX_PAYLOAD_MB,
            fal: FalConfig::default(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = var("PORT").and_then(|port| port.parse().ok());
        let host = var("HOST").unwrap_or(defaults.host);
        let default_model = var("DEFAULT_MODEL")
            .map(|key| DreamModel::from_key(&key))
            .unwrap_or(defaults.default_model);
        let max_payload_mb = var("MAX_PAYLOAD_MB")
            .and_then(|mb| mb.parse().ok())
            .unwrap_or(defaults.max_payload_mb);

        Config {
            host,
            port,
            default_model,
            max_payload_mb,
            fal: FalConfig::from_vars(&var),
            openrouter: OpenRouterConfig::from_vars(&var),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_mb.saturating_mul(1024 * 1024)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_default_model(mut self, model: DreamModel) -> Self {
        self.default_model = model;
        self
    }

    pub fn with_fal(mut self, config: FalConfig) -> Self {
        self.fal = config;
        self
    }

    pub fn with_openrouter(mut self, config: OpenRouterConfig) -> Self {
        self.openrouter = config;
        self
    }
}

fn usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != FAL_KEY_PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[]));
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.default_model, DreamModel::SeedreamV4Edit);
        assert_eq!(config.fal.mode, DispatchMode::Queue);
        assert_eq!(config.fal.max_attempts, 120);
        assert_eq!(config.fal.poll_interval, Duration::from_secs(1));
        assert!(!config.fal.has_credentials());
        assert!(config.openrouter.api_key.is_none());
    }

    #[test]
    fn test_fal_key_fallback_and_placeholder() {
        let config = FalConfig::from_vars(vars(&[("FAL_API_KEY", "abc")]));
        assert_eq!(config.api_key.as_deref(), Some("abc"));

        let config = FalConfig::from_vars(vars(&[
            ("FAL_KEY", "your_fal_api_key_here"),
            ("FAL_API_KEY", "real"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("real"));

        let config = FalConfig::from_vars(vars(&[("FAL_KEY", "your_fal_api_key_here")]));
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("DEFAULT_MODEL", "nano-banana-pro"),
            ("FAL_MODE", "sync"),
            ("FAL_POLL_INTERVAL_MS", "250"),
            ("FAL_MAX_ATTEMPTS", "0"),
            ("OPENROUTER_API_KEY", "or-key"),
            ("OPENROUTER_MODEL", "openai/gpt-4.1"),
        ]));
        assert_eq!(config.port(), 8080);
        assert_eq!(config.default_model, DreamModel::NanoBananaPro);
        assert_eq!(config.fal.mode, DispatchMode::Sync);
        assert_eq!(config.fal.poll_interval, Duration::from_millis(250));
        // zero attempts would never poll, keep the default
        assert_eq!(config.fal.max_attempts, 120);
        assert_eq!(config.openrouter.api_key.as_deref(), Some("or-key"));
        assert_eq!(config.openrouter.model, "openai/gpt-4.1");
    }

    #[test]
    fn test_huge_payload_limit_saturates() {
        let huge = usize::MAX.to_string();
        let config = Config::from_vars(vars(&[("MAX_PAYLOAD_MB", huge.as_str())]));
        assert_eq!(config.max_payload_mb, usize::MAX);
        assert_eq!(config.max_payload_bytes(), usize::MAX);
        assert_eq!(Config::default().max_payload_bytes(), 20 * 1024 * 1024);
    }

    #[test]
    fn test_dispatch_mode_parse() {
        assert_eq!(DispatchMode::parse(" Queue "), Some(DispatchMode::Queue));
        assert_eq!(DispatchMode::parse("SYNC"), Some(DispatchMode::Sync));
        assert_eq!(DispatchMode::parse("stream"), None);
    }
}
