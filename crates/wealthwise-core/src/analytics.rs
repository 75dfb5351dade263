//! Derived analytics over goals and transactions
//!
//! Everything here is a pure function of its inputs. Callers recompute the
//! views whenever the underlying collections change; the scans are linear so
//! nothing is cached.
//!
//! - `top_spending_categories` - ranked spending per category
//! - `fund_distribution` - goals with a positive saved balance, for charting
//! - `upcoming_goals` - goals whose deadline falls within the next 3 days

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{CategorySpend, Distribution, Goal, Transaction};
use crate::state::AppState;

/// Number of categories shown in the top-spending summary
pub const TOP_CATEGORY_LIMIT: usize = 3;

/// Length of the upcoming-deadline lookahead, in days (inclusive)
pub const UPCOMING_WINDOW_DAYS: i64 = 3;

const MS_PER_DAY: i64 = 86_400_000;

/// Total spending per category, highest first, truncated to `limit`.
///
/// Categories with equal totals keep the order in which they first appear
/// in `transactions` (the sort is stable over first-occurrence order).
pub fn top_spending_categories(transactions: &[Transaction], limit: usize) -> Vec<CategorySpend> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for tx in transactions {
        let entry = totals.entry(tx.category.as_str()).or_insert_with(|| {
            order.push(tx.category.as_str());
            0.0
        });
        *entry += tx.amount;
    }

    let mut ranked: Vec<CategorySpend> = order
        .into_iter()
        .map(|name| CategorySpend {
            name: name.to_string(),
            amount: totals[name],
        })
        .collect();

    ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    ranked.truncate(limit);
    ranked
}

/// Saved balance per goal, in goal order, omitting goals with nothing saved
pub fn fund_distribution(goals: &[Goal]) -> Vec<Distribution> {
    goals
        .iter()
        .map(|goal| Distribution::new(goal.name.clone(), goal.current_amount))
        .filter(|d| d.value > 0.0)
        .collect()
}

/// Whole days until the deadline, rounded up.
///
/// The deadline is taken as midnight UTC of its date. A deadline earlier
/// today (already passed by at least one millisecond) yields 0.
pub fn days_left(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline_ms = deadline
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default();
    ceil_div(deadline_ms - now.timestamp_millis(), MS_PER_DAY)
}

/// A goal is upcoming when its deadline is 1, 2, or 3 days away
pub fn is_upcoming(goal: &Goal, now: DateTime<Utc>) -> bool {
    let days = days_left(goal.deadline, now);
    days > 0 && days <= UPCOMING_WINDOW_DAYS
}

/// Goals inside the upcoming window.
///
/// Order follows the input, not urgency.
pub fn upcoming_goals(goals: &[Goal], now: DateTime<Utc>) -> Vec<&Goal> {
    goals.iter().filter(|goal| is_upcoming(goal, now)).collect()
}

/// Percentage of the target saved so far (0 for a zero target)
pub fn goal_progress(goal: &Goal) -> f64 {
    if goal.target_amount == 0.0 {
        return 0.0;
    }
    goal.current_amount / goal.target_amount * 100.0
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}

/// All derived views of the dashboard, computed together
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_balance: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub available_to_save: f64,
    pub top_categories: Vec<CategorySpend>,
    pub fund_distribution: Vec<Distribution>,
    pub upcoming_goals: Vec<Goal>,
}

impl Dashboard {
    pub fn build(state: &AppState, now: DateTime<Utc>) -> Self {
        Self {
            total_balance: state.total_balance,
            monthly_income: state.monthly_income,
            monthly_expenses: state.monthly_expenses,
            available_to_save: state.available_to_save(),
            top_categories: top_spending_categories(&state.transactions, TOP_CATEGORY_LIMIT),
            fund_distribution: fund_distribution(&state.goals),
            upcoming_goals: upcoming_goals(&state.goals, now)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Number shown on the notification badge
    pub fn notification_count(&self) -> usize {
        self.upcoming_goals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn tx(category: &str, amount: f64) -> Transaction {
        Transaction {
            id: 1,
            category: category.to_string(),
            description: String::new(),
            amount,
            date: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        }
    }

    fn goal(id: i64, current: f64, deadline: NaiveDate) -> Goal {
        Goal {
            id,
            name: format!("Goal {}", id),
            target_amount: 1000.0,
            current_amount: current,
            deadline,
            priority: Priority::Medium,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(d: NaiveDate) -> DateTime<Utc> {
        d.and_hms_opt(0, 0, 0).unwrap().and_utc()
    }

    // ========== Top spending categories ==========

    #[test]
    fn test_top_spending_groups_and_ranks() {
        let txs = vec![
            tx("Rent", 2000.0),
            tx("Food", 200.0),
            tx("Shopping", 150.0),
            tx("Food", 100.0),
            tx("Travel", 50.0),
        ];

        let top = top_spending_categories(&txs, TOP_CATEGORY_LIMIT);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], CategorySpend { name: "Rent".into(), amount: 2000.0 });
        assert_eq!(top[1], CategorySpend { name: "Food".into(), amount: 300.0 });
        assert_eq!(top[2], CategorySpend { name: "Shopping".into(), amount: 150.0 });
    }

    #[test]
    fn test_top_spending_ties_keep_first_occurrence() {
        // Seed data: Food and Shopping tie at 200
        let txs = vec![tx("Rent", 2000.0), tx("Food", 200.0), tx("Shopping", 200.0)];
        let top = top_spending_categories(&txs, TOP_CATEGORY_LIMIT);
        let names: Vec<_> = top.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Food", "Shopping"]);

        let txs = vec![tx("Shopping", 200.0), tx("Food", 200.0)];
        let top = top_spending_categories(&txs, TOP_CATEGORY_LIMIT);
        assert_eq!(top[0].name, "Shopping");
        assert_eq!(top[1].name, "Food");
    }

    #[test]
    fn test_top_spending_empty() {
        assert!(top_spending_categories(&[], TOP_CATEGORY_LIMIT).is_empty());
    }

    // ========== Fund distribution ==========

    #[test]
    fn test_fund_distribution_drops_empty_goals() {
        let d = date(2030, 1, 1);
        let goals = vec![goal(1, 100.0, d), goal(2, 0.0, d), goal(3, 50.0, d)];

        let dist = fund_distribution(&goals);
        assert_eq!(
            dist,
            vec![Distribution::new("Goal 1", 100.0), Distribution::new("Goal 3", 50.0)]
        );
    }

    #[test]
    fn test_fund_distribution_empty_when_nothing_saved() {
        let goals = vec![goal(1, 0.0, date(2030, 1, 1))];
        assert!(fund_distribution(&goals).is_empty());
    }

    // ========== Upcoming window ==========

    #[test]
    fn test_upcoming_exactly_three_days_included() {
        let deadline = date(2025, 6, 30);
        let now = midnight(deadline) - Duration::milliseconds(3 * MS_PER_DAY);
        assert_eq!(days_left(deadline, now), 3);
        assert!(is_upcoming(&goal(1, 0.0, deadline), now));
    }

    #[test]
    fn test_upcoming_at_deadline_excluded() {
        let deadline = date(2025, 6, 30);
        let now = midnight(deadline);
        assert_eq!(days_left(deadline, now), 0);
        assert!(!is_upcoming(&goal(1, 0.0, deadline), now));
    }

    #[test]
    fn test_upcoming_just_past_three_days_excluded() {
        let deadline = date(2025, 6, 30);
        let now = midnight(deadline) - Duration::milliseconds(3 * MS_PER_DAY + 1);
        assert_eq!(days_left(deadline, now), 4);
        assert!(!is_upcoming(&goal(1, 0.0, deadline), now));
    }

    #[test]
    fn test_days_left_rounds_up() {
        let deadline = date(2025, 6, 30);
        // One millisecond before the deadline still counts as a day
        let now = midnight(deadline) - Duration::milliseconds(1);
        assert_eq!(days_left(deadline, now), 1);
        // Passed deadlines go negative
        let now = midnight(deadline) + Duration::milliseconds(MS_PER_DAY + 1);
        assert_eq!(days_left(deadline, now), -1);
    }

    #[test]
    fn test_upcoming_goals_keep_input_order_not_urgency() {
        // Notification list is not sorted by urgency; pinned here on purpose
        let now = Utc.with_ymd_and_hms(2025, 6, 27, 12, 0, 0).unwrap();
        let goals = vec![
            goal(1, 0.0, date(2025, 6, 30)), // 3 days
            goal(2, 0.0, date(2025, 7, 15)), // outside window
            goal(3, 0.0, date(2025, 6, 28)), // 1 day
        ];

        let ids: Vec<i64> = upcoming_goals(&goals, now).iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_goal_progress() {
        let d = date(2030, 1, 1);
        assert_eq!(goal_progress(&goal(1, 250.0, d)), 25.0);
        assert_eq!(goal_progress(&goal(1, 1500.0, d)), 150.0);

        let mut zero = goal(1, 10.0, d);
        zero.target_amount = 0.0;
        assert_eq!(goal_progress(&zero), 0.0);
    }

    #[test]
    fn test_dashboard_build() {
        let state = AppState::demo();
        let now = Utc.with_ymd_and_hms(2025, 6, 28, 9, 0, 0).unwrap();
        let dash = Dashboard::build(&state, now);

        assert_eq!(dash.available_to_save, 500.0);
        assert_eq!(dash.top_categories[0].name, "Rent");
        assert_eq!(dash.fund_distribution.len(), 4);
        // Hawaiian Vacation is due 2025-06-30
        assert_eq!(dash.notification_count(), 1);
        assert_eq!(dash.upcoming_goals[0].id, 1);
    }

    #[test]
    fn test_dashboard_json_uses_camel_case() {
        let now = Utc.with_ymd_and_hms(2025, 6, 28, 9, 0, 0).unwrap();
        let json = serde_json::to_value(Dashboard::build(&AppState::demo(), now)).unwrap();

        assert_eq!(json["totalBalance"], 4600.0);
        assert_eq!(json["availableToSave"], 500.0);
        assert!(json["topCategories"].is_array());
        assert!(json["fundDistribution"].is_array());
        assert_eq!(json["upcomingGoals"][0]["targetAmount"], 50000.0);
        assert!(json.get("total_balance").is_none());
    }

    // ========== Properties ==========

    fn category_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Rent", "Food", "Shopping", "Savings", "Travel", "Fuel"])
            .prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn prop_top_categories_sorted_and_sized(
            entries in prop::collection::vec((category_strategy(), 0.01f64..10_000.0), 0..40)
        ) {
            let txs: Vec<Transaction> = entries.iter().map(|(c, a)| tx(c, *a)).collect();
            let distinct: std::collections::HashSet<&str> =
                entries.iter().map(|(c, _)| c.as_str()).collect();

            let top = top_spending_categories(&txs, TOP_CATEGORY_LIMIT);
            prop_assert_eq!(top.len(), distinct.len().min(TOP_CATEGORY_LIMIT));
            for pair in top.windows(2) {
                prop_assert!(pair[0].amount >= pair[1].amount);
            }
        }

        #[test]
        fn prop_fund_distribution_positive_and_ordered(
            amounts in prop::collection::vec(-500.0f64..5_000.0, 0..20)
        ) {
            let d = date(2030, 1, 1);
            let goals: Vec<Goal> = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| goal(i as i64 + 1, *a, d))
                .collect();

            let dist = fund_distribution(&goals);
            prop_assert!(dist.iter().all(|e| e.value > 0.0));

            let expected: Vec<String> = goals
                .iter()
                .filter(|g| g.current_amount > 0.0)
                .map(|g| g.name.clone())
                .collect();
            let actual: Vec<String> = dist.into_iter().map(|e| e.name).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_is_upcoming_matches_ceiling_rule(offset_ms in -10 * MS_PER_DAY..10 * MS_PER_DAY) {
            let deadline = date(2025, 6, 30);
            let now = midnight(deadline) - Duration::milliseconds(offset_ms);
            let days = (offset_ms as f64 / MS_PER_DAY as f64).ceil() as i64;
            prop_assert_eq!(days_left(deadline, now), days);
            prop_assert_eq!(is_upcoming(&goal(1, 0.0, deadline), now), days > 0 && days <= 3);
        }
    }
}
