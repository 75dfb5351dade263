//! Model Router for task-based model selection
//!
//! Each advisor operation maps to a task type, and each task type carries its
//! own model and request timeout. Structured planning and tips use a fast
//! model; scenario analysis uses a stronger reasoning model with a longer
//! timeout.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/wealthwise/config/models.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/models.toml");

/// Task types for model routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// JSON output against a response schema (distribution plans)
    StructuredPlanning,
    /// Longer analysis with explanation (scenario simulation)
    Reasoning,
    /// One or two sentences of free text (mood tips)
    QuickTip,
}

impl TaskType {
    /// Get the config key for this task type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredPlanning => "structured_planning",
            Self::Reasoning => "reasoning",
            Self::QuickTip => "quick_tip",
        }
    }

    /// Get all task types
    pub fn all() -> &'static [TaskType] {
        &[Self::StructuredPlanning, Self::Reasoning, Self::QuickTip]
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "structured_planning" => Ok(Self::StructuredPlanning),
            "reasoning" => Ok(Self::Reasoning),
            "quick_tip" => Ok(Self::QuickTip),
            _ => Err(format!("Unknown task type: {}", s)),
        }
    }
}

/// Configuration for a specific task type
#[derive(Debug, Clone, PartialEq)]
pub struct TaskConfig {
    /// Model to use for this task
    pub model: String,
    /// Upper bound on one outbound call
    pub timeout: Duration,
}

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Default model for all task types
    pub default_model: String,
    /// Default timeout
    pub default_timeout: Duration,
    /// Per-task configurations
    pub tasks: HashMap<TaskType, TaskConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_model: "gemini-2.5-flash".to_string(),
            default_timeout: Duration::from_secs(30),
            tasks: HashMap::new(),
        }
    }
}

/// Model Router for task-based model selection
#[derive(Debug, Clone)]
pub struct ModelRouter {
    config: RouterConfig,
    config_path: Option<PathBuf>,
}

impl ModelRouter {
    /// Create a new model router (override file if present, else embedded)
    pub fn new() -> Result<Self> {
        let config = load_config(None)?;
        Ok(Self {
            config,
            config_path: default_config_path(),
        })
    }

    /// Create with a custom config path
    pub fn with_config_path(path: PathBuf) -> Result<Self> {
        let config = load_config(Some(&path))?;
        Ok(Self {
            config,
            config_path: Some(path),
        })
    }

    /// Create with an explicit configuration (for testing)
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// Get the model to use for a task type
    pub fn model_for_task(&self, task: TaskType) -> &str {
        self.config
            .tasks
            .get(&task)
            .map(|c| c.model.as_str())
            .unwrap_or(&self.config.default_model)
    }

    /// Get the timeout for a task
    pub fn timeout_for_task(&self, task: TaskType) -> Duration {
        self.config
            .tasks
            .get(&task)
            .map(|c| c.timeout)
            .unwrap_or(self.config.default_timeout)
    }

    /// Get the full task configuration
    pub fn config_for_task(&self, task: TaskType) -> TaskConfig {
        TaskConfig {
            model: self.model_for_task(task).to_string(),
            timeout: self.timeout_for_task(task),
        }
    }

    /// Replace every task's model with one model (e.g. a `--model` override)
    pub fn override_model(&mut self, model: &str) {
        self.config.default_model = model.to_string();
        for task in self.config.tasks.values_mut() {
            task.model = model.to_string();
        }
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Get the config path (if using file-based config)
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_config(RouterConfig::default()))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("wealthwise").join("config").join("models.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&PathBuf>) -> Result<RouterConfig> {
    let path = override_path.cloned().or_else(default_config_path);

    let content = match path {
        Some(path) if path.exists() => fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    defaults: Option<RawDefaults>,
    models: Option<HashMap<String, RawTaskConfig>>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawTaskConfig {
    model: Option<String>,
    timeout_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<RouterConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = RouterConfig::default();

    if let Some(defaults) = raw.defaults {
        if let Some(model) = defaults.model {
            config.default_model = model;
        }
        if let Some(timeout) = defaults.timeout_secs {
            config.default_timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(models) = raw.models {
        for (task_name, task_config) in models {
            let Ok(task) = task_name.parse::<TaskType>() else {
                tracing::warn!(task = %task_name, "Ignoring unknown task type in model config");
                continue;
            };

            config.tasks.insert(
                task,
                TaskConfig {
                    model: task_config
                        .model
                        .unwrap_or_else(|| config.default_model.clone()),
                    timeout: task_config
                        .timeout_secs
                        .map(Duration::from_secs)
                        .unwrap_or(config.default_timeout),
                },
            );
        }
    }

    Ok(config)
}
