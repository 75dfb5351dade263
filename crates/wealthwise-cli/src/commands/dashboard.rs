//! Dashboard command implementation

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use wealthwise_core::analytics::days_left;
use wealthwise_core::{format_inr, Dashboard, RequestState};

use super::{open_store, truncate};

pub fn cmd_dashboard(state_path: &Path, json: bool) -> Result<()> {
    let store = open_store(state_path)?;
    let state = store.state();
    let now = Utc::now();
    let dashboard = Dashboard::build(state, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("💼 WealthWise Dashboard");
    println!();
    println!("   Total Balance:      {:>14}", format_inr(dashboard.total_balance));
    println!("   Monthly Income:     {:>14}", format_inr(dashboard.monthly_income));
    println!("   Monthly Expenses:   {:>14}", format_inr(dashboard.monthly_expenses));
    println!("   Available to Save:  {:>14}", format_inr(dashboard.available_to_save));

    if dashboard.available_to_save < 0.0 {
        println!("   ⚠️  Expenses exceed income this month");
    }

    println!();
    println!("📊 Top Spending Categories");
    if dashboard.top_categories.is_empty() {
        println!("   No spending recorded yet");
    }
    for category in &dashboard.top_categories {
        println!(
            "   {} {:<20} {:>14}",
            category.icon(),
            category.name,
            format_inr(category.amount)
        );
    }

    println!();
    println!("🥧 Fund Distribution");
    let saved: f64 = dashboard.fund_distribution.iter().map(|d| d.value).sum();
    if dashboard.fund_distribution.is_empty() {
        println!("   Nothing saved towards goals yet");
    }
    for slice in &dashboard.fund_distribution {
        println!(
            "   {:<30} {:>14}  {:>5.1}%",
            truncate(&slice.name, 30),
            format_inr(slice.value),
            slice.value / saved * 100.0
        );
    }

    println!();
    match dashboard.notification_count() {
        0 => println!("🔔 No upcoming deadlines"),
        n => {
            println!("🔔 {} goal(s) due within 3 days", n);
            for goal in &dashboard.upcoming_goals {
                let days = days_left(goal.deadline, now);
                println!(
                    "   {:<30} {} day{} left",
                    truncate(&goal.name, 30),
                    days,
                    if days == 1 { "" } else { "s" }
                );
            }
        }
    }

    if let RequestState::Succeeded(plan) = &state.advisor.distribution {
        println!();
        println!("🤖 Last AI Distribution Plan");
        for entry in plan {
            println!("   {:<30} {:>14}", truncate(&entry.name, 30), format_inr(entry.value));
        }
    }

    Ok(())
}
