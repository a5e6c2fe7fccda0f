//! Configuration loading, validation, and management for podchat.
//!
//! Loads configuration from `~/.podchat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.podchat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the primary (OpenAI-compatible) provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model assignments per role
    #[serde(default)]
    pub models: ModelConfig,

    /// Vector index / retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// RAG pipeline configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Session memory configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Provider-specific overrides (api_key / api_url per provider name)
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Which model serves which role in the pipeline.
///
/// The grading, generation, and routing calls run on the primary provider;
/// the rewrite, entity-extraction, and summary calls run on the fast
/// provider when one is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Answer generation (podcast-host persona)
    #[serde(default = "default_generator_model")]
    pub generator: String,

    /// The three binary graders
    #[serde(default = "default_grader_model")]
    pub grader: String,

    /// The route classifier (use_rag decision)
    #[serde(default = "default_router_model")]
    pub router: String,

    /// Query rewriting
    #[serde(default = "default_rewriter_model")]
    pub rewriter: String,

    /// Entity extraction for keyword search conditions
    #[serde(default = "default_entity_model")]
    pub entities: String,

    /// Turn summarization into facts
    #[serde(default = "default_summary_model")]
    pub summary: String,

    /// Query embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding: String,
}

fn default_generator_model() -> String {
    "gpt-4o-2024-08-06".into()
}
fn default_grader_model() -> String {
    "gpt-4o-mini".into()
}
fn default_router_model() -> String {
    "gpt-4o-2024-08-06".into()
}
fn default_rewriter_model() -> String {
    "llama3-70b-8192".into()
}
fn default_entity_model() -> String {
    "llama3-8b-8192".into()
}
fn default_summary_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            generator: default_generator_model(),
            grader: default_grader_model(),
            router: default_router_model(),
            rewriter: default_rewriter_model(),
            entities: default_entity_model(),
            summary: default_summary_model(),
            embedding: default_embedding_model(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Qdrant-compatible endpoint URL
    #[serde(default = "default_index_url")]
    pub url: String,

    /// Index API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Collection holding the transcript excerpts
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Embedding dimension of the collection
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,

    /// Documents per retrieval round
    #[serde(default = "default_retrieve_limit")]
    pub limit: usize,

    /// Minimum index score to accept a hit
    #[serde(default)]
    pub score_threshold: f32,

    /// Whether to add full-text entity conditions to the search
    #[serde(default = "default_true")]
    pub full_text_search: bool,
}

fn default_index_url() -> String {
    "http://localhost:6333".into()
}
fn default_collection() -> String {
    "podcasts".into()
}
fn default_vector_size() -> usize {
    1536
}
fn default_retrieve_limit() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            api_key: None,
            collection: default_collection(),
            vector_size: default_vector_size(),
            limit: default_retrieve_limit(),
            score_threshold: 0.0,
            full_text_search: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Retry budget per failure class (retrieval, groundedness, relevance)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Generation temperature
    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,

    /// Max tokens per generated answer
    #[serde(default = "default_max_answer_tokens")]
    pub max_answer_tokens: u32,
}

fn default_max_retries() -> u32 {
    3
}
fn default_generation_temperature() -> f32 {
    0.7
}
fn default_max_answer_tokens() -> u32 {
    1024
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            temperature: default_generation_temperature(),
            max_answer_tokens: default_max_answer_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session backend: "in_memory" or "none"
    #[serde(default = "default_session_backend")]
    pub backend: String,

    /// How many recent messages the route classifier sees
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Whether to summarize each reply into the facts digest
    #[serde(default = "default_true")]
    pub auto_summarize: bool,
}

fn default_session_backend() -> String {
    "in_memory".into()
}
fn default_history_window() -> usize {
    20
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_session_backend(),
            history_window: default_history_window(),
            auto_summarize: true,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("models", &self.models)
            .field("retrieval", &self.retrieval)
            .field("agent", &self.agent)
            .field("session", &self.session)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for RetrievalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalConfig")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("collection", &self.collection)
            .field("vector_size", &self.vector_size)
            .field("limit", &self.limit)
            .field("score_threshold", &self.score_threshold)
            .field("full_text_search", &self.full_text_search)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.podchat/config.toml).
    ///
    /// Also checks environment variables:
    /// - `PODCHAT_API_KEY` / `OPENAI_API_KEY` — primary provider key
    /// - `GROQ_API_KEY` — fast provider key
    /// - `QDRANT_URL` / `QDRANT_API_KEY` — vector index endpoint
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = Self::config_dir();
        let config_path = config_dir.join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("PODCHAT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(groq_key) = std::env::var("GROQ_API_KEY") {
            config
                .providers
                .entry("groq".into())
                .or_insert(ProviderConfig {
                    api_key: None,
                    api_url: None,
                })
                .api_key
                .get_or_insert(groq_key);
        }

        if let Ok(url) = std::env::var("QDRANT_URL") {
            config.retrieval.url = url;
        }
        if config.retrieval.api_key.is_none() {
            config.retrieval.api_key = std::env::var("QDRANT_API_KEY").ok();
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".podchat")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.temperature < 0.0 || self.agent.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "agent.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.retrieval.limit == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.limit must be at least 1".into(),
            ));
        }

        if self.retrieval.vector_size == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.vector_size must be at least 1".into(),
            ));
        }

        if !matches!(self.session.backend.as_str(), "in_memory" | "none") {
            return Err(ConfigError::ValidationError(format!(
                "unknown session backend '{}' (expected 'in_memory' or 'none')",
                self.session.backend
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The fast-provider (Groq) key, if configured.
    pub fn fast_api_key(&self) -> Option<&str> {
        self.providers
            .get("groq")
            .and_then(|p| p.api_key.as_deref())
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: ModelConfig::default(),
            retrieval: RetrievalConfig::default(),
            agent: AgentConfig::default(),
            session: SessionConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
