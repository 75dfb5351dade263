//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the advisory
//! gateway's outbound calls. A backend turns a [`GenerateRequest`] (model
//! id, prompt, expected response shape) into raw model text; prompt
//! building and response validation live in [`crate::advisor`].
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY` (or `API_KEY`): required for the gemini backend
//! - `OPENAI_COMPATIBLE_HOST`: required for the openai_compatible backend

mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Make one outbound call and return the raw model text
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for display)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini (default)
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): requires `GEMINI_API_KEY` (or `API_KEY`)
    /// - `openai_compatible`: requires `OPENAI_COMPATIBLE_HOST`
    /// - `mock`: canned responses for development
    ///
    /// A missing credential is a configuration error.
    pub fn from_env() -> Result<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
        Self::from_backend_name(&backend)
    }

    fn from_backend_name(backend: &str) -> Result<Self> {
        match backend.trim().to_lowercase().as_str() {
            "" | "gemini" | "google" => GeminiBackend::from_env().map(AIClient::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Ok(AIClient::mock()),
            other => Err(Error::Config(format!(
                "Unknown AI_BACKEND '{}' (expected gemini, openai_compatible or mock)",
                other
            ))),
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(api_key))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Short backend name for display
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        }
    }

    /// Model that replaces routed model names, for backends serving one model
    pub fn pinned_model(&self) -> Option<&str> {
        match self {
            AIClient::OpenAICompatible(b) => Some(b.model()),
            AIClient::Gemini(_) | AIClient::Mock(_) => None,
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(request).await,
            AIClient::OpenAICompatible(b) => b.generate(request).await,
            AIClient::Mock(b) => b.generate(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

impl From<MockBackend> for AIClient {
    fn from(mock: MockBackend) -> Self {
        AIClient::Mock(mock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
        assert_eq!(client.backend_name(), "mock");
        assert!(client.pinned_model().is_none());
    }

    #[test]
    fn test_from_backend_name() {
        assert!(matches!(
            AIClient::from_backend_name("MOCK"),
            Ok(AIClient::Mock(_))
        ));
        assert!(matches!(
            AIClient::from_backend_name("ollama"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_openai_compatible_pins_model() {
        let client = AIClient::OpenAICompatible(OpenAICompatibleBackend::new(
            "http://localhost:8000",
            "llama3.2",
        ));
        assert_eq!(client.pinned_model(), Some("llama3.2"));
        assert_eq!(client.backend_name(), "openai_compatible");
    }

    #[tokio::test]
    async fn test_mock_dispatch() {
        let mock = MockBackend::new().with_response("hi");
        let client = AIClient::from(mock.clone());
        assert!(client.health_check().await);
        assert_eq!(
            client.generate(&GenerateRequest::text("m", "p")).await.unwrap(),
            "hi"
        );
        assert_eq!(mock.request_count(), 1);
    }
}
