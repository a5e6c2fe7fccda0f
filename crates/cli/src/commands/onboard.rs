//! `podchat onboard` — write a default configuration file.

use podchat_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("Wrote default config to {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. export OPENAI_API_KEY='sk-...'      (generation, grading, embeddings)");
    println!("  2. export GROQ_API_KEY='gsk_...'       (optional: rewrite/entities/summaries)");
    println!("  3. export QDRANT_URL='https://...'     (your transcript index)");
    println!("  4. podchat chat");

    Ok(())
}
