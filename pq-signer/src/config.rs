//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional configuration
//! file (TOML, JSON or YAML), then `PQ_SIGNER_*` environment variables.
//! Command line flags override the result in `main`.

use crate::encoding::Encoding;
use crate::error::{Result, SignerError};
use crate::output::OutputFormat;
use config::{Config, Environment, File};
use pq_crypto::AlgorithmId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `PQ_SIGNER_DEFAULT_ALGORITHM`
pub const ENV_PREFIX: &str = "PQ_SIGNER";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Algorithm used by `keygen` and `sign` when none is given
    pub default_algorithm: AlgorithmId,

    pub format: OutputFormat,

    /// Encoding of byte arguments and byte outputs
    pub encoding: Encoding,

    pub log_level: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            default_algorithm: AlgorithmId::Dilithium3,
            format: OutputFormat::Text,
            encoding: Encoding::Hex,
            log_level: "warn".to_string(),
        }
    }
}

/// Load configuration from a file, with environment overrides
///
/// # Example
/// ```no_run
/// use pq_signer::config::load_config;
///
/// let config = load_config("pq-signer.toml").expect("Failed to load config");
/// println!("Default algorithm: {}", config.default_algorithm);
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<SignerConfig> {
    load_layered(Some(config_path.as_ref()), ENV_PREFIX)
}

/// Load configuration from environment variables only
pub fn load_config_from_env() -> Result<SignerConfig> {
    load_layered(None, ENV_PREFIX)
}

fn load_layered(config_path: Option<&Path>, env_prefix: &str) -> Result<SignerConfig> {
    let mut builder = Config::builder();
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path));
    }

    let config = builder
        .add_source(Environment::with_prefix(env_prefix))
        .build()
        .map_err(|e| SignerError::Config(format!("Failed to load config: {}", e)))?;

    let signer_config: SignerConfig = config
        .try_deserialize()
        .map_err(|e| SignerError::Config(format!("Failed to parse config: {}", e)))?;

    validate_config(&signer_config)?;

    Ok(signer_config)
}

pub fn validate_config(config: &SignerConfig) -> Result<()> {
    let level = config.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(SignerError::Config(format!(
            "Invalid log_level: {} (expected one of {})",
            config.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}
