//! AI advisory gateway
//!
//! Builds prompts from the current goals and budget, makes exactly one
//! outbound call per operation, and validates the reply. Each call is
//! bounded by its task's timeout and can be cancelled. Any failure is
//! reported as the operation's generic [`Error::Advisor`]; the cause is
//! logged and kept as the error source.
//!
//! The `request_*` methods drive a [`Store`] through the request lifecycle
//! (`AdvisorStarted` then `*Ready` or `AdvisorFailed`).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::ai::parsing::{parse_distribution_plan, parse_text_response};
use crate::ai::{AIBackend, AIClient, AdvisorOperation, GenerateRequest};
use crate::error::{Error, Result};
use crate::model_router::ModelRouter;
use crate::models::{Distribution, Goal, Mood};
use crate::narrative::Narrative;
use crate::prompts::PromptLibrary;
use crate::state::{Action, Store};

/// Validation message for an empty scenario
pub const BLANK_SCENARIO_MESSAGE: &str = "Please enter a scenario.";

/// Cancels in-flight advisor calls
///
/// Clones share the same flag; cancelling any clone cancels them all.
#[derive(Debug, Clone)]
pub struct Cancellation {
    tx: Arc<watch::Sender<bool>>,
}

impl Cancellation {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// The advisory gateway
pub struct Advisor {
    client: AIClient,
    router: ModelRouter,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl Advisor {
    /// Create an advisor. A backend that serves a single model overrides the
    /// routed model names.
    pub fn new(client: AIClient, mut router: ModelRouter, prompts: PromptLibrary) -> Self {
        if let Some(model) = client.pinned_model() {
            router.override_model(model);
        }
        Self {
            client,
            router,
            prompts: Arc::new(RwLock::new(prompts)),
        }
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    /// Ask for a monthly fund distribution across the goals
    pub async fn suggest_distribution(
        &self,
        income: f64,
        goals: &[Goal],
        cancel: &Cancellation,
    ) -> Result<Vec<Distribution>> {
        let operation = AdvisorOperation::Distribution;
        let goal_lines = goals
            .iter()
            .map(|g| {
                format!(
                    "- {}: Target ₹{}, Deadline {}, Priority {}",
                    g.name, g.target_amount, g.deadline, g.priority
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let income = income.to_string();

        let mut vars = HashMap::new();
        vars.insert("income", income.as_str());
        vars.insert("goals", goal_lines.as_str());

        let plan = self
            .call(operation, &vars, cancel)
            .await
            .and_then(|raw| parse_distribution_plan(&raw))
            .map_err(|e| self.fail(operation, e))?;

        info!(allocations = plan.len(), "Distribution plan received");
        Ok(plan)
    }

    /// Analyze a "what if" scenario against the goals and current plan
    ///
    /// A blank scenario is rejected before any call is made.
    pub async fn simulate_scenario(
        &self,
        scenario: &str,
        goals: &[Goal],
        plan: &[Distribution],
        cancel: &Cancellation,
    ) -> Result<Narrative> {
        let operation = AdvisorOperation::Scenario;
        if scenario.trim().is_empty() {
            return Err(Error::Validation(BLANK_SCENARIO_MESSAGE.to_string()));
        }

        let goals_json = serde_json::to_string(
            &goals.iter().map(ScenarioGoal::from).collect::<Vec<_>>(),
        )
        .map_err(|e| self.fail(operation, e.into()))?;
        let plan_json = serde_json::to_string(
            &plan
                .iter()
                .filter(|p| goals.iter().any(|g| g.name == p.name))
                .map(PlanEntry::from)
                .collect::<Vec<_>>(),
        )
        .map_err(|e| self.fail(operation, e.into()))?;

        let mut vars = HashMap::new();
        vars.insert("goals_json", goals_json.as_str());
        vars.insert("plan_json", plan_json.as_str());
        vars.insert("scenario", scenario);

        let text = self
            .call(operation, &vars, cancel)
            .await
            .and_then(|raw| parse_text_response(&raw))
            .map_err(|e| self.fail(operation, e))?;

        Ok(Narrative::new(text))
    }

    /// Ask for one short tip suited to the user's mood
    pub async fn mood_tip(
        &self,
        mood: Mood,
        goals: &[Goal],
        cancel: &Cancellation,
    ) -> Result<String> {
        let operation = AdvisorOperation::MoodTip;
        let goal_names = goals
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut vars = HashMap::new();
        vars.insert("goal_names", goal_names.as_str());
        vars.insert("mood", mood.as_str());

        self.call(operation, &vars, cancel)
            .await
            .and_then(|raw| parse_text_response(&raw))
            .map_err(|e| self.fail(operation, e))
    }

    /// Request a plan for the store's goals and income, recording the outcome
    pub async fn request_distribution(
        &self,
        store: &mut Store,
        cancel: &Cancellation,
    ) -> Result<()> {
        let operation = AdvisorOperation::Distribution;
        store.dispatch(Action::AdvisorStarted(operation))?;

        let state = store.state();
        let outcome = self
            .suggest_distribution(state.monthly_income, &state.goals, cancel)
            .await;

        match outcome {
            Ok(plan) => store.dispatch(Action::DistributionReady(plan)),
            Err(e) => record_failure(store, operation, e),
        }
    }

    /// Run a scenario against the store's goals and last plan, recording the outcome
    pub async fn request_scenario(
        &self,
        store: &mut Store,
        scenario: &str,
        cancel: &Cancellation,
    ) -> Result<()> {
        let operation = AdvisorOperation::Scenario;
        if scenario.trim().is_empty() {
            return record_failure(
                store,
                operation,
                Error::Validation(BLANK_SCENARIO_MESSAGE.to_string()),
            );
        }
        store.dispatch(Action::AdvisorStarted(operation))?;

        let state = store.state();
        let outcome = self
            .simulate_scenario(
                scenario,
                &state.goals,
                state.advisor.current_plan(),
                cancel,
            )
            .await;

        match outcome {
            Ok(narrative) => store.dispatch(Action::ScenarioReady(narrative)),
            Err(e) => record_failure(store, operation, e),
        }
    }

    /// Ask for a mood tip for the store's goals, recording the outcome
    pub async fn request_mood_tip(
        &self,
        store: &mut Store,
        mood: Mood,
        cancel: &Cancellation,
    ) -> Result<()> {
        let operation = AdvisorOperation::MoodTip;
        store.dispatch(Action::AdvisorStarted(operation))?;

        let outcome = self.mood_tip(mood, &store.state().goals, cancel).await;

        match outcome {
            Ok(tip) => store.dispatch(Action::TipReady(tip)),
            Err(e) => record_failure(store, operation, e),
        }
    }

    /// Render the prompt, then make one bounded, cancellable call
    async fn call(
        &self,
        operation: AdvisorOperation,
        vars: &HashMap<&str, &str>,
        cancel: &Cancellation,
    ) -> Result<String> {
        let request = self.build_request(operation, vars)?;
        let timeout = self.router.timeout_for_task(operation.task_type());

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        debug!(
            operation = operation.as_str(),
            model = %request.model,
            host = self.client.host(),
            "Sending AI request"
        );

        tokio::select! {
            outcome = tokio::time::timeout(timeout, self.client.generate(&request)) => {
                outcome.map_err(|_| Error::Timeout(timeout))?
            }
            _ = cancel.cancelled() => Err(Error::Cancelled),
        }
    }

    fn build_request(
        &self,
        operation: AdvisorOperation,
        vars: &HashMap<&str, &str>,
    ) -> Result<GenerateRequest> {
        let rendered = {
            let mut prompts = self
                .prompts
                .write()
                .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
            prompts.get(operation.prompt_id())?.render_parts(vars)
        };

        let model = self.router.model_for_task(operation.task_type());
        let mut request =
            GenerateRequest::text(model, rendered.user).with_format(operation.output_format());
        request.system = rendered.system;
        Ok(request)
    }

    fn fail(&self, operation: AdvisorOperation, cause: Error) -> Error {
        warn!(
            operation = operation.as_str(),
            backend = self.client.backend_name(),
            error = %cause,
            "AI request failed"
        );
        Error::advisor(operation, cause)
    }
}

/// Record a failed request in the store and hand the error back to the caller
fn record_failure(store: &mut Store, operation: AdvisorOperation, error: Error) -> Result<()> {
    store.dispatch(Action::AdvisorFailed {
        operation,
        message: error.to_string(),
    })?;
    Err(error)
}

/// Goal as embedded in the scenario prompt
#[derive(Serialize)]
struct ScenarioGoal<'a> {
    name: &'a str,
    target: String,
    current: String,
    deadline: NaiveDate,
}

impl<'a> From<&'a Goal> for ScenarioGoal<'a> {
    fn from(goal: &'a Goal) -> Self {
        Self {
            name: &goal.name,
            target: format!("₹{}", goal.target_amount),
            current: format!("₹{}", goal.current_amount),
            deadline: goal.deadline,
        }
    }
}

/// Plan entry as embedded in the scenario prompt
#[derive(Serialize)]
struct PlanEntry<'a> {
    name: &'a str,
    #[serde(serialize_with = "plain_number")]
    value: f64,
}

impl<'a> From<&'a Distribution> for PlanEntry<'a> {
    fn from(entry: &'a Distribution) -> Self {
        Self {
            name: &entry.name,
            value: entry.value,
        }
    }
}

/// Whole amounts serialize without a trailing `.0`
fn plain_number<S: Serializer>(value: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        s.serialize_i64(*value as i64)
    } else {
        s.serialize_f64(*value)
    }
}
