//! WealthWise CLI - Savings goals with an AI advisor
//!
//! Usage:
//!   wealthwise dashboard                  Show the dashboard summary
//!   wealthwise goals add -n NAME -t 5000 -d 2025-06-01
//!   wealthwise goals fund 2 500           Move ₹500 from the balance into goal 2
//!   wealthwise advise plan                Ask for a monthly distribution plan
//!   wealthwise advise simulate "TEXT"     Run a what-if scenario

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wealthwise_core::{AIClient, FileThemeStore, ModelRouter, PromptLibrary};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Dashboard { json } => commands::cmd_dashboard(&cli.state, json),
        Commands::Goals { action } => match action {
            None | Some(GoalsAction::List) => commands::cmd_goals_list(&cli.state),
            Some(GoalsAction::Add {
                name,
                target,
                deadline,
                current,
                priority,
            }) => {
                let deadline = chrono::NaiveDate::parse_from_str(&deadline, "%Y-%m-%d")
                    .context("Invalid --deadline date format (use YYYY-MM-DD)")?;
                commands::cmd_goals_add(&cli.state, &name, target, current, deadline, priority)
            }
            Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&cli.state, id),
            Some(GoalsAction::Fund { id, amount }) => {
                commands::cmd_goals_fund(&cli.state, id, amount)
            }
        },
        Commands::Budget {
            balance,
            income,
            expenses,
            available,
        } => commands::cmd_budget(
            &cli.state,
            commands::BudgetUpdate {
                balance,
                income,
                expenses,
                available,
            },
        ),
        Commands::Advise { timeout, action } => {
            let advisor = commands::build_advisor(timeout)?;
            let cancel = commands::cancel_on_ctrl_c();
            match action {
                AdviseAction::Plan => commands::cmd_advise_plan(&cli.state, &advisor, &cancel).await,
                AdviseAction::Simulate { scenario } => {
                    commands::cmd_advise_simulate(&cli.state, &advisor, &scenario, &cancel).await
                }
                AdviseAction::Tip { mood } => {
                    commands::cmd_advise_tip(&cli.state, &advisor, mood, &cancel).await
                }
            }
        }
        Commands::Theme { action } => {
            let store = FileThemeStore::default_location()?;
            match action {
                None | Some(ThemeAction::Show) => commands::cmd_theme_show(&store),
                Some(ThemeAction::Toggle) => commands::cmd_theme_toggle(&store),
                Some(ThemeAction::Set { theme }) => commands::cmd_theme_set(&store, theme),
            }
        }
        Commands::Ai { action } => match action {
            AiAction::Status => {
                let router = ModelRouter::new().context("Failed to load model routing config")?;
                commands::cmd_ai_status(AIClient::from_env(), &router).await
            }
        },
        Commands::Prompts { action } => {
            let mut library = PromptLibrary::new();
            match action {
                PromptsAction::List => commands::cmd_prompts_list(&mut library),
                PromptsAction::Show { prompt_id } => {
                    commands::cmd_prompts_show(&mut library, &prompt_id)
                }
                PromptsAction::Path => commands::cmd_prompts_path(),
            }
        }
    }
}
