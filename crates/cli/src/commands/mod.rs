//! CLI command implementations and shared wiring.

pub mod ask;
pub mod chat;
pub mod onboard;
pub mod search;

use podchat_agent::{AnswerGenerator, Grader, QueryRewriter, RagPipeline, RouteClassifier};
use podchat_config::AppConfig;
use podchat_core::provider::Provider;
use podchat_core::session::SessionStore;
use podchat_memory::{InMemorySession, NoopSession, TurnSummarizer};
use podchat_retrieval::{EntityExtractor, HybridRetriever, QdrantIndex};
use std::sync::Arc;

/// Everything a chat-facing command needs, wired from config.
pub(crate) struct Stack {
    pub config: AppConfig,
    pub primary: Arc<dyn Provider>,
    pub router: RouteClassifier,
    pub pipeline: RagPipeline,
    pub session: Arc<dyn SessionStore>,
    pub summarizer: TurnSummarizer,
}

/// Build the hybrid retriever from config.
pub(crate) fn build_retriever(
    config: &AppConfig,
    primary: Arc<dyn Provider>,
    fast: Arc<dyn Provider>,
) -> HybridRetriever {
    let index = Arc::new(QdrantIndex::new(
        config.retrieval.url.clone(),
        config.retrieval.api_key.clone(),
        config.retrieval.collection.clone(),
    ));
    let entities = EntityExtractor::new(fast, config.models.entities.clone());

    HybridRetriever::new(index, primary, entities, config.models.embedding.clone())
        .with_score_threshold(config.retrieval.score_threshold)
        .with_full_text_search(config.retrieval.full_text_search)
}

/// Wire the full stack from config.
pub(crate) fn build_stack(config: AppConfig) -> Stack {
    let primary = podchat_providers::primary_from_config(&config);
    let fast = podchat_providers::fast_from_config(&config);

    let retriever = build_retriever(&config, primary.clone(), fast.clone());

    let grader = Grader::new(primary.clone(), config.models.grader.clone());
    let rewriter = QueryRewriter::new(fast.clone(), config.models.rewriter.clone());
    let generator = AnswerGenerator::new(primary.clone(), config.models.generator.clone())
        .with_temperature(config.agent.temperature)
        .with_max_tokens(config.agent.max_answer_tokens);

    let pipeline = RagPipeline::new(Arc::new(retriever), grader, rewriter, generator)
        .with_retrieve_limit(config.retrieval.limit)
        .with_max_retries(config.agent.max_retries);

    let router = RouteClassifier::new(primary.clone(), config.models.router.clone());

    let session: Arc<dyn SessionStore> = match config.session.backend.as_str() {
        "none" => Arc::new(NoopSession),
        _ => Arc::new(InMemorySession::new()),
    };

    let summarizer = TurnSummarizer::new(fast, config.models.summary.clone());

    Stack {
        config,
        primary,
        router,
        pipeline,
        session,
        summarizer,
    }
}

/// Fail early with setup instructions when no API key is configured.
pub(crate) fn require_api_key(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.has_api_key() {
        return Ok(());
    }

    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    export PODCHAT_API_KEY='sk-...'   (generic)");
    eprintln!("    export OPENAI_API_KEY='sk-...'    (for OpenAI direct)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}
