//! AI backend status command

use anyhow::Result;
use wealthwise_core::{AIBackend, AIClient, ModelRouter, TaskType};

/// Show which backend is configured, how tasks are routed, and whether the backend answers
pub async fn cmd_ai_status(
    client: wealthwise_core::Result<AIClient>,
    router: &ModelRouter,
) -> Result<()> {
    println!("🔍 AI backend status\n");

    println!("Model routing:");
    match router.config_path() {
        Some(path) if path.exists() => println!("  Config: {}", path.display()),
        _ => println!("  Config: built-in defaults"),
    }
    for &task in TaskType::all() {
        let config = router.config_for_task(task);
        println!(
            "  {:<20} {:<24} {:>4}s",
            task.as_str(),
            config.model,
            config.timeout.as_secs()
        );
    }
    println!();

    let client = match client {
        Ok(client) => client,
        Err(e) => {
            println!("  ⚠️  {}", e);
            println!();
            println!("To configure the AI backend:");
            println!("  Gemini (default):  export GEMINI_API_KEY=...");
            println!("  OpenAI-compatible: export AI_BACKEND=openai_compatible OPENAI_COMPATIBLE_HOST=http://localhost:8080");
            println!("  Offline mock:      export AI_BACKEND=mock");
            return Ok(());
        }
    };

    println!("  Backend: {}", client.backend_name());
    println!("  Host:    {}", client.host());
    if let Some(model) = client.pinned_model() {
        println!("  Model:   {} (used for every task)", model);
    }

    print!("\nChecking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
    }

    Ok(())
}
