//! AI advisor command implementations
//!
//! Each command loads the snapshot, runs one advisor request through the
//! store, and writes the snapshot back whatever the outcome, so a failure
//! message is kept alongside earlier results.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use wealthwise_core::{
    format_inr, AIClient, Advisor, Cancellation, Mood, ModelRouter, Narrative, PromptLibrary,
    RouterConfig, TaskConfig, TaskType,
};

use super::{open_store, save_store, truncate};

/// Build the advisor from the environment, optionally forcing one timeout for every task
pub fn build_advisor(timeout_secs: Option<u64>) -> Result<Advisor> {
    let client = AIClient::from_env().context("AI backend is not configured")?;
    let mut router = ModelRouter::new().context("Failed to load model routing config")?;
    if let Some(secs) = timeout_secs {
        router = with_timeout(&router, Duration::from_secs(secs));
    }
    Ok(Advisor::new(client, router, PromptLibrary::new()))
}

/// Copy of `router` with the same models and a single timeout
pub fn with_timeout(router: &ModelRouter, timeout: Duration) -> ModelRouter {
    let tasks = TaskType::all()
        .iter()
        .map(|&task| {
            (
                task,
                TaskConfig {
                    model: router.model_for_task(task).to_string(),
                    timeout,
                },
            )
        })
        .collect();

    ModelRouter::with_config(RouterConfig {
        default_model: router.config().default_model.clone(),
        default_timeout: timeout,
        tasks,
    })
}

/// A cancellation handle that fires on Ctrl-C
pub fn cancel_on_ctrl_c() -> Cancellation {
    let cancel = Cancellation::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Cancelling AI request");
            handle.cancel();
        }
    });
    cancel
}

/// Ask for a monthly distribution plan and print it
pub async fn cmd_advise_plan(
    state_path: &Path,
    advisor: &Advisor,
    cancel: &Cancellation,
) -> Result<()> {
    let mut store = open_store(state_path)?;
    println!(
        "🤖 Asking {} for a distribution plan...",
        advisor.router().model_for_task(TaskType::StructuredPlanning)
    );

    let outcome = advisor.request_distribution(&mut store, cancel).await;
    save_store(state_path, &store)?;
    outcome?;

    let state = store.state();
    let plan = state.advisor.current_plan();
    let total: f64 = plan.iter().map(|d| d.value).sum();

    println!();
    println!("📋 Suggested monthly distribution of {}", format_inr(state.monthly_income));
    println!();
    for entry in plan {
        let share = if state.monthly_income > 0.0 {
            entry.value / state.monthly_income * 100.0
        } else {
            0.0
        };
        println!(
            "   {:<30} {:>14}  {:>5.1}%",
            truncate(&entry.name, 30),
            format_inr(entry.value),
            share
        );
    }
    println!("   {}", "-".repeat(52));
    println!("   {:<30} {:>14}", "Total", format_inr(total));

    if (total - state.monthly_income).abs() >= 0.01 {
        println!();
        println!(
            "   ⚠️  The plan does not add up to your income ({} difference)",
            format_inr(total - state.monthly_income)
        );
    }

    Ok(())
}

/// Run a what-if scenario against the goals and the last plan
pub async fn cmd_advise_simulate(
    state_path: &Path,
    advisor: &Advisor,
    scenario: &str,
    cancel: &Cancellation,
) -> Result<()> {
    let mut store = open_store(state_path)?;
    if !scenario.trim().is_empty() {
        println!(
            "🔮 Simulating with {}...",
            advisor.router().model_for_task(TaskType::Reasoning)
        );
    }

    let outcome = advisor.request_scenario(&mut store, scenario, cancel).await;
    save_store(state_path, &store)?;
    outcome?;

    if let Some(narrative) = store.state().advisor.scenario.result() {
        println!();
        println!("{}", narrative.to_terminal());
    }

    Ok(())
}

/// Get a short tip for the current mood
pub async fn cmd_advise_tip(
    state_path: &Path,
    advisor: &Advisor,
    mood: Mood,
    cancel: &Cancellation,
) -> Result<()> {
    let mut store = open_store(state_path)?;

    let outcome = advisor.request_mood_tip(&mut store, mood, cancel).await;
    save_store(state_path, &store)?;
    outcome?;

    if let Some(tip) = store.state().advisor.tip.result() {
        println!("💡 Feeling {}: {}", mood, Narrative::new(tip.as_str()).to_terminal());
    }

    Ok(())
}
