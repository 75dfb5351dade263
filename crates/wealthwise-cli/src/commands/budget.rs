//! Budget command implementation

use std::path::Path;

use anyhow::Result;
use wealthwise_core::{format_inr, Action};

use super::{open_store, save_store};

/// Budget figures to change; `None` leaves a figure as it is
#[derive(Debug, Default, Clone, Copy)]
pub struct BudgetUpdate {
    pub balance: Option<f64>,
    pub income: Option<f64>,
    pub expenses: Option<f64>,
    pub available: Option<f64>,
}

impl BudgetUpdate {
    fn is_empty(&self) -> bool {
        self.balance.is_none()
            && self.income.is_none()
            && self.expenses.is_none()
            && self.available.is_none()
    }

    /// Actions in the order they apply. Income goes before available-to-save
    /// so the derived expenses use the new income.
    fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(v) = self.balance {
            actions.push(Action::SetTotalBalance(v));
        }
        if let Some(v) = self.income {
            actions.push(Action::SetMonthlyIncome(v));
        }
        if let Some(v) = self.expenses {
            actions.push(Action::SetMonthlyExpenses(v));
        }
        if let Some(v) = self.available {
            actions.push(Action::SetAvailableToSave(v));
        }
        actions
    }
}

/// Apply budget edits and print the resulting figures
pub fn cmd_budget(state_path: &Path, update: BudgetUpdate) -> Result<()> {
    let mut store = open_store(state_path)?;

    if !update.is_empty() {
        for action in update.actions() {
            store.dispatch(action)?;
        }
        save_store(state_path, &store)?;
        println!("✅ Budget updated");
        println!();
    }

    let state = store.state();
    println!("   Total Balance:      {:>14}", format_inr(state.total_balance));
    println!("   Monthly Income:     {:>14}", format_inr(state.monthly_income));
    println!("   Monthly Expenses:   {:>14}", format_inr(state.monthly_expenses));
    println!("   Available to Save:  {:>14}", format_inr(state.available_to_save()));

    Ok(())
}
