//! AI backend request types
//!
//! These types are backend-agnostic; each backend translates a
//! [`GenerateRequest`] into its own wire format.

use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::model_router::TaskType;
use crate::models::Distribution;
use crate::prompts::PromptId;

/// The three advisory operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorOperation {
    /// Monthly fund distribution plan (structured JSON)
    Distribution,
    /// "What if" scenario analysis (markdown narrative)
    Scenario,
    /// Mood-conditioned tip (short text)
    MoodTip,
}

impl AdvisorOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distribution => "distribution",
            Self::Scenario => "scenario",
            Self::MoodTip => "mood_tip",
        }
    }

    /// User-facing message shown for any failure of this operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Distribution => {
                "Failed to get a distribution plan from the AI. Please try again."
            }
            Self::Scenario => "Failed to run the scenario simulation. Please try again.",
            Self::MoodTip => "Failed to get a personalized tip. Please try again.",
        }
    }

    /// Routing task type (model and timeout)
    pub fn task_type(&self) -> TaskType {
        match self {
            Self::Distribution => TaskType::StructuredPlanning,
            Self::Scenario => TaskType::Reasoning,
            Self::MoodTip => TaskType::QuickTip,
        }
    }

    /// Prompt template used to build the request
    pub fn prompt_id(&self) -> PromptId {
        match self {
            Self::Distribution => PromptId::DistributionPlan,
            Self::Scenario => PromptId::ScenarioSimulation,
            Self::MoodTip => PromptId::MoodTip,
        }
    }

    /// Expected response shape
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Self::Distribution => OutputFormat::DistributionList,
            Self::Scenario | Self::MoodTip => OutputFormat::Text,
        }
    }
}

impl std::fmt::Display for AdvisorOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response shape requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Free text (markdown allowed)
    #[default]
    Text,
    /// JSON array of `{name, value}` objects
    DistributionList,
}

impl OutputFormat {
    /// JSON Schema for structured formats, `None` for free text
    pub fn json_schema(&self) -> Option<serde_json::Value> {
        match self {
            Self::Text => None,
            Self::DistributionList => {
                serde_json::to_value(schema_for!(Vec<Distribution>)).ok()
            }
        }
    }

    /// Short name used for schema naming and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::DistributionList => "distribution_plan",
        }
    }
}

/// One outbound call: model id, prompt text and expected response shape
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub format: OutputFormat,
}

impl GenerateRequest {
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            format: OutputFormat::Text,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
