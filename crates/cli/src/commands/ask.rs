//! `podchat ask` — answer a single question and exit.

use podchat_agent::RagRequest;
use podchat_config::AppConfig;

pub async fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    super::require_api_key(&config)?;

    let stack = super::build_stack(config);

    eprint!("  Thinking...");
    // Single-shot: no session history, so the classifier decides from the
    // question alone.
    let decision = stack
        .router
        .classify(question, &[], "No facts available")
        .await?;

    let answer = if decision.use_rag {
        stack
            .pipeline
            .execute(RagRequest {
                query: question.to_string(),
                intent: decision.user_intent,
                emotion: decision.output_emotion,
                history: "No facts available".to_string(),
            })
            .await
    } else {
        decision.answer
    };
    eprint!("\r             \r");

    println!("{answer}");
    Ok(())
}
