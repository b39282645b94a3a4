use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://api.cofacts.tw/graphql";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            app_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Id of the logged-in user; enables the "replied by me" filter.
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub user: UserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub client: ClientConfig,
    pub resolved_output: String,
}

/// Location of the user config file, if a config directory exists.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rumors/config.toml"))
}

/// Load a config file; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ClientConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config from [`config_path`].
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<ClientConfig> {
    let Some(path) = config_path() else {
        return Ok(ClientConfig::default());
    };
    load_config_from(&path)
}

/// Apply `RUMORS_API_URL` on top of file values.
fn apply_env_overrides(mut config: ClientConfig, api_url: Option<String>) -> ClientConfig {
    if let Some(url) = api_url.filter(|v| !v.is_empty()) {
        config.api.endpoint = url;
    }
    config
}

/// Layer env overrides on the user config and resolve the output mode.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
pub fn resolve_config(cli_json: bool) -> Result<EffectiveConfig> {
    let client = apply_env_overrides(load_config()?, env::var("RUMORS_API_URL").ok());

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, client.output.clone(), env_format)?;

    Ok(EffectiveConfig {
        client,
        resolved_output,
    })
}

fn resolve_output(
    cli_json: bool,
    user_output: Option<String>,
    env_format: Option<String>,
) -> Result<String> {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            // canonical values
            "pretty" => Some("pretty"),
            "text" => Some("text"),
            "json" => Some("json"),
            // legacy compatibility
            "human" => Some("pretty"),
            "table" => Some("text"),
            _ => None,
        }
    }

    if cli_json {
        return Ok("json".to_string());
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return Ok(mode.to_string());
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return Ok(mode.to_string());
    }

    if std::io::stdout().is_terminal() {
        Ok("pretty".to_string())
    } else {
        Ok("text".to_string())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}
