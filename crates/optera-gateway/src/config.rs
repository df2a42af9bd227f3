//! Gateway configuration
//!
//! Layers, later ones winning:
//!
//! 1. built-in defaults ([`GatewayConfig::default`])
//! 2. the file named by `OPTERA_CONFIG`, format chosen by extension
//!    (`.toml`, `.json`, `.yaml`, `.ini`, `.ron`, `.json5`)
//! 3. `OPTERA_*` environment variables, `__` between nesting levels
//!    (`OPTERA_LLM__MODEL`, `OPTERA_ALLOCATION__OUTPUT_CACHE_TTL_SECS`)
//!
//! The conventional `ANTHROPIC_API_KEY` and `MARA_API_KEY` fill the API keys
//! when the layers leave them empty; `PORT` sets the port unless
//! `OPTERA_PORT` is present.

use config::{Config, Environment, File};
use optera_foundation::ChatConfig;
use optera_foundation::llm::AnthropicConfig;
use optera_foundation::market::{BtcClientConfig, MarketClientConfig};
use optera_foundation::status::DEFAULT_STATUS_INFERENCE_PRIORITY;
use optera_kernel::accounting::DEFAULT_POWER_LIMIT_WATTS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Names the optional configuration file.
pub const CONFIG_PATH_ENV: &str = "OPTERA_CONFIG";
pub const ENV_PREFIX: &str = "OPTERA";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Config loading error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config file not found: {0}")]
    MissingFile(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Serve the in-process demo site instead of the live APIs
    pub mock_data: bool,
    pub market: MarketClientConfig,
    pub btc: BtcClientConfig,
    pub llm: AnthropicConfig,
    pub allocation: AllocationSettings,
    pub chat: ChatConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            mock_data: false,
            market: MarketClientConfig::default(),
            btc: BtcClientConfig::default(),
            llm: AnthropicConfig::default(),
            allocation: AllocationSettings::default(),
            chat: ChatConfig::default(),
        }
    }
}

/// Allocation workflow and status board tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    /// Used when an allocate or evaluate request carries no power limit
    pub default_power_limit_watts: f64,
    pub status_inference_priority: f64,
    /// Lifetime of the cached allocation status line
    pub output_cache_ttl_secs: u64,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            default_power_limit_watts: DEFAULT_POWER_LIMIT_WATTS,
            status_inference_priority: DEFAULT_STATUS_INFERENCE_PRIORITY,
            output_cache_ttl_secs: 30,
        }
    }
}

impl AllocationSettings {
    pub fn output_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.output_cache_ttl_secs)
    }
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn load() -> ConfigResult<Self> {
        let file = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty());
        let mut config = Self::from_sources(file.as_deref().map(Path::new), env_source())?;
        config.apply_conventional_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults, then `file`, then `env`.
    pub fn from_sources(file: Option<&Path>, env: Environment) -> ConfigResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.add_source(env).build()?.try_deserialize()?)
    }

    /// Fill empty keys and the port from conventional variable names.
    pub fn apply_conventional_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.llm.api_key.trim().is_empty() {
            if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
                self.llm.api_key = key;
            }
        }
        if self.market.api_key.trim().is_empty() {
            if let Some(key) = non_empty("MARA_API_KEY") {
                self.market.api_key = key;
            }
        }
        if non_empty("OPTERA_PORT").is_none() {
            if let Some(port) = non_empty("PORT").and_then(|p| p.trim().parse().ok()) {
                self.port = port;
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `OPTERA_*` variables with `__` as the nesting separator.
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
