//! `podchat chat` — interactive podcast chat session.

use super::Stack;
use podchat_agent::RagRequest;
use podchat_config::AppConfig;
use podchat_core::message::{Conversation, Message};
use podchat_core::session::SessionTurn;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    super::require_api_key(&config)?;

    let stack = super::build_stack(config);

    if !stack.primary.health_check().await.unwrap_or(false) {
        warn!("Primary provider is unreachable; calls will likely fail");
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        podchat — Interactive Podcast Chat      ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:    {}", stack.primary.name());
    println!("  Generator:   {}", stack.config.models.generator);
    println!("  Collection:  {}", stack.config.retrieval.collection);
    println!("  Session:     {}", stack.session.name());
    println!();
    println!("  Hello! I'm a podcast host. Ask me anything about the podcast.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut conversation = Conversation::new();
    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let query = line.trim().to_string();
        if query.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if matches!(query.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        eprint!("  ...");
        let reply = handle_turn(&stack, &mut conversation, &query).await;
        eprint!("\r     \r");

        match reply {
            Ok(reply) => {
                println!();
                for line in reply.lines() {
                    println!("  Host > {line}");
                }
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

/// Run one user turn: classify the route, answer from history or run the
/// pipeline, then record and summarize the exchange.
async fn handle_turn(
    stack: &Stack,
    conversation: &mut Conversation,
    query: &str,
) -> Result<String, podchat_core::Error> {
    let facts = match stack.session.facts().await {
        Ok(facts) if !facts.is_empty() => facts.join("\n"),
        _ => "No facts available".to_string(),
    };

    let window = stack.config.session.history_window;
    let decision = stack
        .router
        .classify(query, conversation.recent(window), &facts)
        .await?;

    let reply = if decision.use_rag {
        stack
            .pipeline
            .execute(RagRequest {
                query: query.to_string(),
                intent: decision.user_intent,
                emotion: decision.output_emotion,
                history: facts,
            })
            .await
    } else {
        decision.answer
    };

    conversation.push(Message::user(query));
    conversation.push(Message::assistant(&reply));

    let summary = if stack.config.session.auto_summarize {
        match stack.summarizer.summarize(&reply).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "Turn summarization failed");
                None
            }
        }
    } else {
        None
    };

    if let Err(e) = stack
        .session
        .record_turn(SessionTurn::new(query, reply.clone()).with_summary(summary))
        .await
    {
        warn!(error = %e, "Failed to record turn");
    }

    Ok(reply)
}
