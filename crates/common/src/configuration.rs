use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DATASOURCE, DEFAULT_PAGE_SIZE};
use crate::errors::PipelineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub version: Option<String>,
    pub glean: GleanConfig,
    pub agent: Option<AgentConfig>,
    pub listener: Option<Listener>,
}

/// Connection settings for the vendor search API. The bearer token is
/// never read from the config file; `main` injects it from the
/// environment after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GleanConfig {
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub token: String,
    #[serde(default = "default_datasource")]
    pub datasource: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_negative_label")]
    pub negative_label: String,
    #[serde(default = "default_positive_label")]
    pub positive_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub agent_id: String,
    /// Defaults to `glean.base_url` when absent.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listener {
    pub address: Option<String>,
    pub port: Option<u16>,
}

fn default_datasource() -> String {
    DEFAULT_DATASOURCE.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_negative_label() -> String {
    "chat-negative".to_string()
}

fn default_positive_label() -> String {
    "chat-positive".to_string()
}

impl GleanConfig {
    /// Fails fast on missing credentials, before any network activity.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.base_url.trim().is_empty() {
            return Err(PipelineError::Config("glean.base_url is not set".to_string()));
        }
        if self.token.trim().is_empty() {
            return Err(PipelineError::Config(
                "bearer token is not set (GLEAN_API_TOKEN)".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(PipelineError::Config("glean.page_size must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Configuration {
    pub fn agent_base_url(&self) -> Option<&str> {
        match &self.agent {
            Some(agent) => Some(agent.base_url.as_deref().unwrap_or(&self.glean.base_url)),
            None => None,
        }
    }
}
