//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wealthwise_core::{Mood, Priority, Theme};

/// WealthWise - Track savings goals and ask an AI advisor how to fund them
#[derive(Parser)]
#[command(name = "wealthwise")]
#[command(about = "Savings goal tracker with an AI financial advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Dashboard snapshot path (demo data is used when the file is missing)
    #[arg(long, default_value = "wealthwise.json", global = true)]
    pub state: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show balance, top spending, fund distribution and upcoming deadlines
    Dashboard {
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage savings goals (list, add, delete, fund)
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Edit the budget figures
    ///
    /// With no flags, prints the current figures.
    Budget {
        /// Set the total balance
        #[arg(long)]
        balance: Option<f64>,

        /// Set the monthly income
        #[arg(long)]
        income: Option<f64>,

        /// Set the monthly expenses
        #[arg(long)]
        expenses: Option<f64>,

        /// Set the amount available to save (adjusts expenses)
        #[arg(long, conflicts_with = "expenses")]
        available: Option<f64>,
    },

    /// Ask the AI advisor (distribution plan, what-if scenario, mood tip)
    Advise {
        /// Override the per-task timeout in seconds
        #[arg(long, global = true)]
        timeout: Option<u64>,

        #[command(subcommand)]
        action: AdviseAction,
    },

    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Inspect the AI backend
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },

    /// Manage AI prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List all goals with progress and days left
    List,

    /// Add a new goal
    Add {
        /// Goal name (e.g., "🏠 House Deposit")
        #[arg(short, long)]
        name: String,

        /// Target amount in rupees
        #[arg(short, long)]
        target: f64,

        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,

        /// Amount already saved
        #[arg(short, long, default_value = "0")]
        current: f64,

        /// Priority: high, medium, low
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: i64,
    },

    /// Move money from the total balance into a goal
    Fund {
        /// Goal ID
        id: i64,

        /// Amount in rupees
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum AdviseAction {
    /// Suggest how to split monthly income across the goals
    Plan,

    /// Describe the impact of a what-if scenario on the goals
    Simulate {
        /// Scenario text (e.g., "I get a ₹1,000 raise")
        scenario: String,
    },

    /// A short tip for how you feel about money today
    Tip {
        /// Mood: neutral, stressed, confident, hopeful
        #[arg(short, long)]
        mood: Mood,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Show the current theme
    Show,

    /// Switch between light and dark
    Toggle,

    /// Set the theme explicitly
    Set {
        /// light or dark
        theme: Theme,
    },
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Show the backend, model routing and whether the backend is reachable
    Status,
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., distribution_plan, mood_tip)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
