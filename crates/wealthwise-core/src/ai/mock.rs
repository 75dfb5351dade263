//! Mock backend for testing
//!
//! Replies come from a queue of scripted responses; when the queue is empty
//! a canned answer matching the requested format is returned. Every request
//! is recorded so tests can assert what was (or was not) sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{GenerateRequest, OutputFormat};
use super::AIBackend;

/// Canned plan returned for structured requests when nothing is scripted
const DEFAULT_PLAN: &str = r#"[{"name":"Living Expenses","value":3000},{"name":"Discretionary Spending","value":500}]"#;

/// Canned text returned for free-text requests when nothing is scripted
const DEFAULT_TEXT: &str = "Small, steady contributions add up. Try moving a fixed amount to savings on payday.";

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
    delay: Option<Duration>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Queue a raw model reply
    pub fn with_response(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(MockReply::Text(text.into()));
        self
    }

    /// Queue a transport failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        lock(&self.replies).push_back(MockReply::Fail(message.into()));
        self
    }

    /// Wait this long before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<GenerateRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        lock(&self.requests).push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = lock(&self.replies).pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(Error::InvalidData(message)),
            None => Ok(match request.format {
                OutputFormat::DistributionList => DEFAULT_PLAN.to_string(),
                OutputFormat::Text => DEFAULT_TEXT.to_string(),
            }),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parsing::parse_distribution_plan;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockBackend::new()
            .with_response("first")
            .with_failure("boom");

        let req = GenerateRequest::text("m", "p");
        assert_eq!(mock.generate(&req).await.unwrap(), "first");
        assert!(mock.generate(&req).await.is_err());
        assert_eq!(mock.generate(&req).await.unwrap(), DEFAULT_TEXT);
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test]
    async fn test_default_plan_is_valid() {
        let mock = MockBackend::new();
        let req = GenerateRequest::text("m", "p").with_format(OutputFormat::DistributionList);
        let raw = mock.generate(&req).await.unwrap();
        assert_eq!(parse_distribution_plan(&raw).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let mock = MockBackend::new();
        let clone = mock.clone();
        clone
            .generate(&GenerateRequest::text("gemini-2.5-flash", "hello").with_system("sys"))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-2.5-flash");
        assert_eq!(requests[0].system.as_deref(), Some("sys"));
    }

    #[tokio::test]
    async fn test_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
