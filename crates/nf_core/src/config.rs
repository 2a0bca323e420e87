use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Error;
use crate::types::{PER_SOURCE_LIMIT, SUMMARY_MAX, SUMMARY_MIN};
use crate::Result;

/// Run configuration, built once at startup and passed by reference into
/// each component's constructor. There is no ambient global state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Credential triple for the remote generative agent. Opaque to the
/// pipeline; only the HTTP client interprets it.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub auth_key: String,
    #[serde(default)]
    pub auth_secret: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: default_agent_endpoint(),
            agent_id: String::new(),
            auth_key: String::new(),
            auth_secret: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Source tags whose titles are already in the target language and
    /// must not be translated.
    #[serde(default = "default_native_tags")]
    pub native_tags: Vec<String>,
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    /// One batched agent exchange per run when true; the paced per-article
    /// path when false.
    #[serde(default = "default_batch")]
    pub batch: bool,
    /// Delay between agent sub-calls and between successive articles on
    /// the per-article path.
    #[serde(default = "default_pacing_secs")]
    pub pacing_secs: u64,
    #[serde(default = "default_summary_min")]
    pub summary_min: usize,
    #[serde(default = "default_summary_max")]
    pub summary_max: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            native_tags: default_native_tags(),
            per_source_limit: default_per_source_limit(),
            batch: default_batch(),
            pacing_secs: default_pacing_secs(),
            summary_min: default_summary_min(),
            summary_max: default_summary_max(),
        }
    }
}

impl PipelineConfig {
    pub fn is_native(&self, tag: &str) -> bool {
        self.native_tags.iter().any(|t| t == tag)
    }
}

fn default_agent_endpoint() -> String {
    "https://uat.agentspro.cn/openapi/agent/chat/completions/v1".to_string()
}

fn default_table() -> String {
    "ai_news".to_string()
}

fn default_native_tags() -> Vec<String> {
    vec!["36kr".to_string()]
}

fn default_per_source_limit() -> usize {
    PER_SOURCE_LIMIT
}

fn default_batch() -> bool {
    true
}

fn default_pacing_secs() -> u64 {
    10
}

fn default_summary_min() -> usize {
    SUMMARY_MIN
}

fn default_summary_max() -> usize {
    SUMMARY_MAX
}

impl AppConfig {
    /// Load configuration from an optional YAML file, overridable through
    /// `NF_`-prefixed environment variables (e.g. `NF_STORE__URL`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        builder = match path {
            Some(path) => builder.add_source(File::new(path, FileFormat::Yaml)),
            None => builder.add_source(File::with_name("config").required(false)),
        };
        let settings = builder
            .add_source(Environment::with_prefix("NF").separator("__"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }
}
