//! Goal command implementations

use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use wealthwise_core::analytics::{days_left, goal_progress};
use wealthwise_core::{format_inr, Action, NewGoal, Priority};

use super::{open_store, save_store, truncate};

/// List all goals with progress and days left
pub fn cmd_goals_list(state_path: &Path) -> Result<()> {
    let store = open_store(state_path)?;
    let goals = &store.state().goals;

    if goals.is_empty() {
        println!("No goals yet. Add one with: wealthwise goals add --name NAME --target AMOUNT --deadline YYYY-MM-DD");
        return Ok(());
    }

    let now = Utc::now();

    println!(
        "{:>4}  {:<28} {:<8} {:>14} {:>14} {:>7}  {}",
        "ID", "NAME", "PRIORITY", "SAVED", "TARGET", "DONE", "DEADLINE"
    );
    println!("{}", "-".repeat(100));

    for goal in goals {
        let days = days_left(goal.deadline, now);
        let remaining = if days > 0 {
            format!("{} ({} days left)", goal.deadline, days)
        } else {
            format!("{} (passed)", goal.deadline)
        };
        println!(
            "{:>4}  {:<28} {:<8} {:>14} {:>14} {:>6.1}%  {}",
            goal.id,
            truncate(&goal.name, 28),
            goal.priority.as_str(),
            format_inr(goal.current_amount),
            format_inr(goal.target_amount),
            goal_progress(goal),
            remaining
        );
    }

    Ok(())
}

/// Add a new goal
pub fn cmd_goals_add(
    state_path: &Path,
    name: &str,
    target: f64,
    current: f64,
    deadline: NaiveDate,
    priority: Priority,
) -> Result<()> {
    let mut store = open_store(state_path)?;

    store.dispatch(Action::AddGoal(NewGoal {
        name: name.to_string(),
        target_amount: target,
        current_amount: current,
        deadline,
        priority,
    }))?;
    save_store(state_path, &store)?;

    let id = store.state().goals.last().map(|g| g.id).unwrap_or_default();
    println!("✅ Added goal #{}: {} ({} by {})", id, name, format_inr(target), deadline);

    Ok(())
}

/// Delete a goal
pub fn cmd_goals_delete(state_path: &Path, id: i64) -> Result<()> {
    let mut store = open_store(state_path)?;
    let name = store.state().goal(id).map(|g| g.name.clone());

    store.dispatch(Action::DeleteGoal(id))?;
    save_store(state_path, &store)?;

    println!("🗑️  Deleted goal #{}: {}", id, name.unwrap_or_default());
    Ok(())
}

/// Move money from the total balance into a goal
pub fn cmd_goals_fund(state_path: &Path, id: i64, amount: f64) -> Result<()> {
    let mut store = open_store(state_path)?;

    store.dispatch(Action::AddFunds {
        goal_id: id,
        amount,
        at: Utc::now(),
    })?;
    save_store(state_path, &store)?;

    let state = store.state();
    if let Some(goal) = state.goal(id) {
        println!(
            "💰 Added {} to {} ({} of {}, {:.1}%)",
            format_inr(amount),
            goal.name,
            format_inr(goal.current_amount),
            format_inr(goal.target_amount),
            goal_progress(goal)
        );
    }
    println!("   Total balance is now {}", format_inr(state.total_balance));

    Ok(())
}
