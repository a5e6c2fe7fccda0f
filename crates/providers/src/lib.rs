//! LLM Provider implementations for podchat.
//!
//! All providers implement the `podchat_core::Provider` trait. Two logical
//! providers serve the pipeline: a primary one (generation, grading, routing,
//! embeddings) and a fast one (query rewriting, entity extraction, turn
//! summaries) when a Groq key is configured.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use podchat_config::AppConfig;
use podchat_core::Provider;
use std::sync::Arc;

/// Build the primary provider from config.
///
/// Honors a `[providers.openai]` api_url override (e.g. an OpenAI-compatible
/// proxy or Ollama).
pub fn primary_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let api_key = config.api_key.clone().unwrap_or_default();
    match config
        .providers
        .get("openai")
        .and_then(|p| p.api_url.as_deref())
    {
        Some(url) => Arc::new(OpenAiCompatProvider::new("openai", url, api_key)),
        None => Arc::new(OpenAiCompatProvider::openai(api_key)),
    }
}

/// Build the fast provider from config.
///
/// Falls back to the primary provider when no Groq key is configured, so the
/// pipeline always has something to run rewrite/entity/summary calls on.
pub fn fast_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    match config.fast_api_key() {
        Some(key) => Arc::new(OpenAiCompatProvider::groq(key)),
        None => primary_from_config(config),
    }
}
