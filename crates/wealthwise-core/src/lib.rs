//! WealthWise Core Library
//!
//! Shared functionality for the WealthWise savings goal tracker:
//! - Domain models for goals, transactions and allocations
//! - Derived dashboard analytics (top spending, fund projection, deadlines)
//! - Reducer-style state store with an explicit AI request lifecycle
//! - AI advisory gateway over pluggable backends (Gemini, OpenAI-compatible, mock)
//! - Model router for per-task model and timeout selection
//! - Prompt library for customizable AI prompts
//! - Theme preference and JSON snapshot persistence

pub mod advisor;
pub mod ai;
pub mod analytics;
pub mod error;
pub mod model_router;
pub mod models;
pub mod narrative;
pub mod preferences;
pub mod prompts;
pub mod snapshot;
pub mod state;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advisor, Cancellation};
pub use ai::{
    AIBackend, AIClient, AdvisorOperation, GeminiBackend, GenerateRequest, MockBackend,
    OpenAICompatibleBackend, OutputFormat,
};
pub use analytics::Dashboard;
pub use error::{Error, Result};
pub use model_router::{ModelRouter, RouterConfig, TaskConfig, TaskType};
pub use models::{
    format_inr, CategorySpend, Distribution, Goal, Mood, NewGoal, Priority, Transaction,
};
pub use narrative::Narrative;
pub use preferences::{FileThemeStore, MemoryThemeStore, Theme, ThemeStore};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use snapshot::{load_snapshot, save_snapshot};
pub use state::{reduce, Action, AdvisorState, AppState, RequestState, Store};
