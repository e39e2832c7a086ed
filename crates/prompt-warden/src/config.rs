use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use gen_client::GenConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            generation: GenerationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_listen")]
    pub listen_addr: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerationConfig {
    /// Full generateContent endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the API key.  The key is
    /// never written into the config file itself.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub stub: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            stub: false,
        }
    }
}

impl GenerationConfig {
    /// Resolve into a [`GenConfig`], reading the API key from the
    /// configured environment variable.  Placeholder values are treated as
    /// unset so a templated deployment falls back to stub mode instead of
    /// sending a bogus key.
    pub fn resolve(&self) -> GenConfig {
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty() && !k.contains("REPLACE"));

        GenConfig {
            endpoint: self.endpoint.clone(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            stub: self.stub,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_audit_path")]
    pub audit_log_path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            audit_log_path: default_audit_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default-value functions used by serde
// ---------------------------------------------------------------------------

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        .to_string()
}

fn default_api_key_env() -> String {
    "GEN_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("audit.jsonl")
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load configuration from a YAML file.
///
/// A missing file yields the default configuration with a warning, so the
/// gate starts with sensible defaults before any config has been written.
pub fn load(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        warn!(
            path = %path.display(),
            "configuration file not found; using defaults"
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

    let config: Config = serde_yml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load(Path::new("/nonexistent/warden.yaml")).unwrap();
        assert_eq!(cfg.network.listen_addr, "127.0.0.1:8080");
        assert!(!cfg.generation.stub);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: Config = serde_yml::from_str(
            r#"
network:
  listen_addr: "0.0.0.0:9000"
generation:
  stub: true
"#,
        )
        .unwrap();
        assert_eq!(cfg.network.listen_addr, "0.0.0.0:9000");
        assert!(cfg.generation.stub);
        assert_eq!(cfg.generation.timeout_secs, 20);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn resolve_treats_placeholder_key_as_unset() {
        let gen = GenerationConfig {
            api_key_env: "WARDEN_TEST_PLACEHOLDER_KEY".to_string(),
            ..GenerationConfig::default()
        };
        std::env::set_var("WARDEN_TEST_PLACEHOLDER_KEY", "REPLACE_ME");
        let resolved = gen.resolve();
        assert!(resolved.api_key.is_none());
        std::env::remove_var("WARDEN_TEST_PLACEHOLDER_KEY");
    }
}
