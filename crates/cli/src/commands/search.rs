//! `podchat search` — dump raw retrieval results for a query.
//!
//! Debugging aid for the index: shows what the pipeline would receive,
//! before any grading.

use podchat_config::AppConfig;
use podchat_core::retrieval::Retriever;

pub async fn run(query: &str, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    super::require_api_key(&config)?;

    let primary = podchat_providers::primary_from_config(&config);
    let fast = podchat_providers::fast_from_config(&config);
    let retriever = super::build_retriever(&config, primary, fast);

    let limit = limit.unwrap_or(config.retrieval.limit);
    let documents = retriever.retrieve(query, limit).await?;

    if documents.is_empty() {
        println!("No documents found for '{query}'");
        return Ok(());
    }

    println!("{} document(s) for '{query}':", documents.len());
    println!();
    for doc in documents.iter() {
        println!("  [{:.3}] {} — {}", doc.score, doc.title, doc.subtopic);
        if !doc.speakers.is_empty() {
            println!("          speakers: {}", doc.speakers.join(", "));
        }
        if !doc.timestamp.is_empty() {
            println!("          at {} — {}", doc.timestamp, doc.url);
        }
        let preview: String = doc.content.chars().take(160).collect();
        println!("          {preview}");
        println!();
    }

    Ok(())
}
