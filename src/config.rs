use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for chainstate
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainstateConfig {
    /// Engine behaviour
    pub chain: ChainConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Keep a transition record for every executed step
    pub record_history: bool,
    /// Maximum number of records kept (oldest dropped first)
    pub history_limit: Option<usize>,
    /// Maximum number of steps a single `run()` may take
    pub max_steps: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            record_history: true,
            history_limit: None,
            max_steps: None, // Unbounded, run until an end state
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON-formatted log lines
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl ChainstateConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (chainstate.toml)
    /// 3. Environment variables (prefixed with CHAINSTATE__)
    pub fn load() -> Result<Self> {
        let path = Path::new("chainstate.toml");
        if path.exists() {
            Self::load_from(Some(path))
        } else {
            Self::load_from(None)
        }
    }

    /// Same as `load`, reading an explicit file instead of the default one.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        // Nested keys: CHAINSTATE__CHAIN__MAX_STEPS=100
        builder = builder.add_source(
            Environment::with_prefix("CHAINSTATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let chainstate_config: ChainstateConfig = config.try_deserialize()?;

        Ok(chainstate_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
