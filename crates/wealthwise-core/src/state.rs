//! Application state and its transitions
//!
//! All mutations go through [`reduce`], a pure `(state, action) -> state`
//! function. A rejected action returns an error and the caller keeps the
//! previous state, so guard failures never leave partial updates behind.
//! [`Store`] wraps that cycle for callers that hold one live state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::AdvisorOperation;
use crate::error::{Error, Result};
use crate::models::{Distribution, Goal, NewGoal, Priority, Transaction, SAVINGS_CATEGORY};
use crate::narrative::Narrative;

/// The whole dashboard state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub goals: Vec<Goal>,
    pub transactions: Vec<Transaction>,
    pub total_balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    #[serde(default)]
    pub advisor: AdvisorState,
}

impl AppState {
    /// Empty state with the given budget figures
    pub fn new(total_balance: f64, monthly_income: f64, monthly_expenses: f64) -> Self {
        Self {
            goals: Vec::new(),
            transactions: Vec::new(),
            total_balance,
            monthly_income,
            monthly_expenses,
            advisor: AdvisorState::default(),
        }
    }

    /// The demo dashboard shipped with the app
    pub fn demo() -> Self {
        let goal = |id, name: &str, target, current, (y, m, d), priority| Goal {
            id,
            name: name.to_string(),
            target_amount: target,
            current_amount: current,
            deadline: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            priority,
        };
        let tx = |id, category: &str, description: &str, amount, (y, m, d)| Transaction {
            id,
            category: category.to_string(),
            description: description.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
                .unwrap_or_default(),
        };

        Self {
            goals: vec![
                goal(1, "🌴 Hawaiian Vacation", 50000.0, 10000.0, (2025, 6, 30), Priority::High),
                goal(2, "🚗 New Car Down Payment", 100000.0, 40000.0, (2025, 12, 31), Priority::Medium),
                goal(3, "🚨 Emergency Fund", 150000.0, 90000.0, (2026, 12, 31), Priority::High),
                goal(4, "💻 Tech Gadgets", 25000.0, 5000.0, (2024, 11, 30), Priority::Low),
            ],
            transactions: vec![
                tx(1, "Rent", "Monthly Rent", 2000.0, (2024, 7, 1)),
                tx(2, "Food", "Groceries", 200.0, (2024, 7, 3)),
                tx(3, "Shopping", "New Clothes", 200.0, (2024, 7, 5)),
            ],
            total_balance: 4600.0,
            monthly_income: 5000.0,
            monthly_expenses: 4500.0,
            advisor: AdvisorState::default(),
        }
    }

    /// Income left after expenses
    pub fn available_to_save(&self) -> f64 {
        self.monthly_income - self.monthly_expenses
    }

    pub fn goal(&self, id: i64) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Id for the next goal: one past the largest, or 1 for an empty list
    pub fn next_goal_id(&self) -> i64 {
        self.goals.iter().map(|g| g.id).max().map_or(1, |max| max + 1)
    }

    /// Transaction id for a creation time, bumped past any existing id
    fn next_transaction_id(&self, at: DateTime<Utc>) -> i64 {
        let stamp = at.timestamp_millis();
        match self.transactions.iter().map(|t| t.id).max() {
            Some(max) if max >= stamp => max + 1,
            _ => stamp,
        }
    }
}

/// Something the user (or a finished AI request) did
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddGoal(NewGoal),
    DeleteGoal(i64),
    /// Move `amount` from the total balance into a goal
    AddFunds {
        goal_id: i64,
        amount: f64,
        at: DateTime<Utc>,
    },
    SetTotalBalance(f64),
    SetMonthlyIncome(f64),
    SetMonthlyExpenses(f64),
    /// Edit the derived figure; expenses absorb the change
    SetAvailableToSave(f64),
    AdvisorStarted(AdvisorOperation),
    DistributionReady(Vec<Distribution>),
    ScenarioReady(Narrative),
    TipReady(String),
    AdvisorFailed {
        operation: AdvisorOperation,
        message: String,
    },
}

/// Apply an action, producing the next state.
///
/// On error the input state is untouched and should be kept as-is.
pub fn reduce(state: &AppState, action: Action) -> Result<AppState> {
    let mut next = state.clone();

    match action {
        Action::AddGoal(new_goal) => {
            validate_new_goal(&new_goal)?;
            let id = next.next_goal_id();
            info!(goal_id = id, name = %new_goal.name, "Adding goal");
            next.goals.push(new_goal.with_id(id));
        }
        Action::DeleteGoal(goal_id) => {
            let before = next.goals.len();
            next.goals.retain(|g| g.id != goal_id);
            if next.goals.len() == before {
                return Err(Error::NotFound(format!("goal {}", goal_id)));
            }
            info!(goal_id, "Deleted goal");
        }
        Action::AddFunds {
            goal_id,
            amount,
            at,
        } => {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::InvalidAmount(amount));
            }
            if amount > next.total_balance {
                return Err(Error::InsufficientFunds {
                    requested: amount,
                    available: next.total_balance,
                });
            }

            let id = next.next_transaction_id(at);
            let goal = next
                .goals
                .iter_mut()
                .find(|g| g.id == goal_id)
                .ok_or_else(|| Error::NotFound(format!("goal {}", goal_id)))?;
            goal.current_amount += amount;
            let description = format!("Contribution to {}", goal.name);

            next.total_balance -= amount;
            next.monthly_expenses += amount;
            next.transactions.push(Transaction {
                id,
                category: SAVINGS_CATEGORY.to_string(),
                description,
                amount,
                date: at,
            });
            info!(goal_id, amount, "Added funds to goal");
        }
        Action::SetTotalBalance(value) => next.total_balance = stored_amount(value)?,
        Action::SetMonthlyIncome(value) => next.monthly_income = stored_amount(value)?,
        Action::SetMonthlyExpenses(value) => next.monthly_expenses = stored_amount(value)?,
        Action::SetAvailableToSave(value) => {
            // May be negative (overspending), but the derived expenses may not
            if !value.is_finite() {
                return Err(Error::InvalidAmount(value));
            }
            next.monthly_expenses = stored_amount(next.monthly_income - value)?;
        }
        Action::AdvisorStarted(operation) => {
            debug!(operation = operation.as_str(), "AI request pending");
            match operation {
                AdvisorOperation::Distribution => next.advisor.distribution = RequestState::Pending,
                AdvisorOperation::Scenario => next.advisor.scenario = RequestState::Pending,
                AdvisorOperation::MoodTip => next.advisor.tip = RequestState::Pending,
            }
        }
        Action::DistributionReady(plan) => {
            next.advisor.distribution = RequestState::Succeeded(plan);
        }
        Action::ScenarioReady(narrative) => {
            next.advisor.scenario = RequestState::Succeeded(narrative);
        }
        Action::TipReady(tip) => {
            next.advisor.tip = RequestState::Succeeded(tip);
        }
        Action::AdvisorFailed { operation, message } => match operation {
            AdvisorOperation::Distribution => {
                next.advisor.distribution = RequestState::Failed(message)
            }
            AdvisorOperation::Scenario => next.advisor.scenario = RequestState::Failed(message),
            AdvisorOperation::MoodTip => next.advisor.tip = RequestState::Failed(message),
        },
    }

    Ok(next)
}

fn validate_new_goal(goal: &NewGoal) -> Result<()> {
    if goal.name.trim().is_empty() || goal.target_amount.is_nan() || goal.target_amount <= 0.0 {
        return Err(Error::Validation(
            "Please fill in all required fields.".to_string(),
        ));
    }
    if !goal.target_amount.is_finite() {
        return Err(Error::InvalidAmount(goal.target_amount));
    }
    stored_amount(goal.current_amount)?;
    Ok(())
}

/// Stored money figures are finite and non-negative; JSON has no NaN or infinity
fn stored_amount(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidAmount(value))
    }
}

/// Lifecycle of one AI request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Per-operation request state for the AI assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdvisorState {
    pub distribution: RequestState<Vec<Distribution>>,
    pub scenario: RequestState<Narrative>,
    pub tip: RequestState<String>,
}

impl AdvisorState {
    /// True while any request is in flight
    pub fn is_loading(&self) -> bool {
        self.distribution.is_pending() || self.scenario.is_pending() || self.tip.is_pending()
    }

    /// The last plan that came back, or an empty plan
    pub fn current_plan(&self) -> &[Distribution] {
        self.distribution.result().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Holds the live state and runs actions through [`reduce`]
#[derive(Debug, Clone)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply an action; on error the current state is kept
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        self.state = reduce(&self.state, action)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn new_goal(name: &str, target: f64) -> NewGoal {
        NewGoal {
            name: name.to_string(),
            target_amount: target,
            current_amount: 0.0,
            deadline: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            priority: Priority::Medium,
        }
    }

    // ========== Goals ==========

    #[test]
    fn test_add_goal_assigns_max_plus_one() {
        let state = AppState::demo();
        let next = reduce(&state, Action::AddGoal(new_goal("Laptop", 80000.0))).unwrap();
        assert_eq!(next.goals.len(), 5);
        assert_eq!(next.goals[4].id, 5);
        assert_eq!(next.goals[4].name, "Laptop");
    }

    #[test]
    fn test_add_goal_to_empty_gets_id_one() {
        let state = AppState::new(0.0, 0.0, 0.0);
        let next = reduce(&state, Action::AddGoal(new_goal("First", 10.0))).unwrap();
        assert_eq!(next.goals[0].id, 1);
    }

    #[test]
    fn test_add_goal_uses_max_not_len() {
        let mut state = AppState::demo();
        state.goals.retain(|g| g.id != 2);
        let next = reduce(&state, Action::AddGoal(new_goal("Bike", 500.0))).unwrap();
        assert_eq!(next.goals.last().unwrap().id, 5);
    }

    #[test]
    fn test_add_goal_requires_fields() {
        let state = AppState::demo();
        let err = reduce(&state, Action::AddGoal(new_goal("  ", 100.0))).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields.");
        assert!(reduce(&state, Action::AddGoal(new_goal("Bike", 0.0))).is_err());
    }

    #[test]
    fn test_delete_goal() {
        let state = AppState::demo();
        let next = reduce(&state, Action::DeleteGoal(2)).unwrap();
        assert!(next.goal(2).is_none());
        assert_eq!(next.goals.len(), 3);

        assert!(matches!(
            reduce(&next, Action::DeleteGoal(2)),
            Err(Error::NotFound(_))
        ));
    }

    // ========== Funding ==========

    #[test]
    fn test_add_funds_moves_balance_into_goal() {
        let state = AppState::demo();
        let next = reduce(
            &state,
            Action::AddFunds {
                goal_id: 1,
                amount: 600.0,
                at: now(),
            },
        )
        .unwrap();

        assert_eq!(next.total_balance, 4000.0);
        assert_eq!(next.goal(1).unwrap().current_amount, 10600.0);
        assert_eq!(next.monthly_expenses, 5100.0);
        assert_eq!(next.transactions.len(), state.transactions.len() + 1);

        let tx = next.transactions.last().unwrap();
        assert_eq!(tx.category, "Savings");
        assert_eq!(tx.amount, 600.0);
        assert_eq!(tx.description, "Contribution to 🌴 Hawaiian Vacation");
        assert_eq!(tx.date, now());
        assert_eq!(tx.id, now().timestamp_millis());
    }

    #[test]
    fn test_add_funds_whole_balance_allowed() {
        let state = AppState::demo();
        let next = reduce(
            &state,
            Action::AddFunds {
                goal_id: 3,
                amount: 4600.0,
                at: now(),
            },
        )
        .unwrap();
        assert_eq!(next.total_balance, 0.0);
    }

    #[test]
    fn test_add_funds_over_balance_rejected() {
        let mut store = Store::new(AppState::demo());
        let before = store.state().clone();

        let err = store
            .dispatch(Action::AddFunds {
                goal_id: 1,
                amount: 4600.01,
                at: now(),
            })
            .unwrap_err();

        assert!(matches!(err, Error::InsufficientFunds { .. }));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_add_funds_non_positive_rejected() {
        let mut store = Store::new(AppState::demo());
        let before = store.state().clone();

        for amount in [0.0, -50.0, f64::NAN] {
            let result = store.dispatch(Action::AddFunds {
                goal_id: 1,
                amount,
                at: now(),
            });
            assert!(matches!(result, Err(Error::InvalidAmount(_))));
        }
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_add_funds_unknown_goal_rejected() {
        let state = AppState::demo();
        let result = reduce(
            &state,
            Action::AddFunds {
                goal_id: 99,
                amount: 10.0,
                at: now(),
            },
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_transaction_ids_stay_unique_within_one_millisecond() {
        let mut store = Store::new(AppState::demo());
        for _ in 0..3 {
            store
                .dispatch(Action::AddFunds {
                    goal_id: 1,
                    amount: 1.0,
                    at: now(),
                })
                .unwrap();
        }
        let ids: std::collections::HashSet<i64> =
            store.state().transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), store.state().transactions.len());
    }

    // ========== Budget figures ==========

    #[test]
    fn test_available_to_save_tracks_income_and_expenses() {
        let mut store = Store::new(AppState::demo());
        assert_eq!(store.state().available_to_save(), 500.0);

        store.dispatch(Action::SetMonthlyIncome(6000.0)).unwrap();
        assert_eq!(store.state().available_to_save(), 1500.0);

        store.dispatch(Action::SetMonthlyExpenses(5800.0)).unwrap();
        assert_eq!(store.state().available_to_save(), 200.0);

        store.dispatch(Action::SetAvailableToSave(1000.0)).unwrap();
        assert_eq!(store.state().monthly_expenses, 5000.0);
        assert_eq!(
            store.state().available_to_save(),
            store.state().monthly_income - store.state().monthly_expenses
        );
    }

    #[test]
    fn test_set_total_balance() {
        let next = reduce(&AppState::demo(), Action::SetTotalBalance(10.0)).unwrap();
        assert_eq!(next.total_balance, 10.0);
    }

    #[test]
    fn test_budget_figures_reject_non_finite_and_negative() {
        let state = AppState::demo();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -500.0] {
            for action in [
                Action::SetTotalBalance(value),
                Action::SetMonthlyIncome(value),
                Action::SetMonthlyExpenses(value),
            ] {
                let result = reduce(&state, action);
                assert!(matches!(result, Err(Error::InvalidAmount(_))), "{}", value);
            }
        }
    }

    #[test]
    fn test_available_to_save_may_go_negative_but_not_expenses() {
        let state = AppState::demo();

        let next = reduce(&state, Action::SetAvailableToSave(-250.0)).unwrap();
        assert_eq!(next.monthly_expenses, 5250.0);
        assert_eq!(next.available_to_save(), -250.0);

        // More than the income would need negative expenses
        let result = reduce(&state, Action::SetAvailableToSave(5001.0));
        assert!(matches!(result, Err(Error::InvalidAmount(_))));

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = reduce(&state, Action::SetAvailableToSave(value));
            assert!(matches!(result, Err(Error::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_add_goal_rejects_non_finite_amounts() {
        let state = AppState::demo();

        let result = reduce(&state, Action::AddGoal(new_goal("Moon", f64::INFINITY)));
        assert!(matches!(result, Err(Error::InvalidAmount(_))));

        let mut goal = new_goal("Bike", 1000.0);
        goal.current_amount = f64::NAN;
        let result = reduce(&state, Action::AddGoal(goal));
        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_add_funds_rejects_infinite_amount() {
        let result = reduce(
            &AppState::demo(),
            Action::AddFunds {
                goal_id: 1,
                amount: f64::INFINITY,
                at: now(),
            },
        );
        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }

    // ========== Advisor lifecycle ==========

    #[test]
    fn test_advisor_lifecycle() {
        let mut store = Store::new(AppState::demo());
        assert!(!store.state().advisor.is_loading());

        store
            .dispatch(Action::AdvisorStarted(AdvisorOperation::Distribution))
            .unwrap();
        assert!(store.state().advisor.is_loading());

        let plan = vec![Distribution::new("Living Expenses", 4000.0)];
        store
            .dispatch(Action::DistributionReady(plan.clone()))
            .unwrap();
        assert!(!store.state().advisor.is_loading());
        assert_eq!(store.state().advisor.current_plan(), plan.as_slice());
    }

    #[test]
    fn test_advisor_failure_leaves_other_results() {
        let mut store = Store::new(AppState::demo());
        store.dispatch(Action::TipReady("Save a little".into())).unwrap();

        store
            .dispatch(Action::AdvisorStarted(AdvisorOperation::Scenario))
            .unwrap();
        store
            .dispatch(Action::AdvisorFailed {
                operation: AdvisorOperation::Scenario,
                message: "Failed to run the scenario simulation. Please try again.".into(),
            })
            .unwrap();

        let advisor = &store.state().advisor;
        assert_eq!(
            advisor.scenario.error(),
            Some("Failed to run the scenario simulation. Please try again.")
        );
        assert_eq!(advisor.tip.result().map(String::as_str), Some("Save a little"));
        assert!(!advisor.is_loading());
    }

    #[test]
    fn test_current_plan_empty_by_default() {
        assert!(AppState::demo().advisor.current_plan().is_empty());
    }

    #[test]
    fn test_state_json_roundtrip_keeps_advisor_results() {
        let mut state = AppState::demo();
        state.advisor.tip = RequestState::Succeeded("tip".into());
        let json = serde_json::to_string(&state).unwrap();
        let back: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
