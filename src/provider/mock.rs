//! Mock provider for testing
//!
//! Returns configurable responses without making real API calls.
//! Supports latency and failure injection for runner race tests.

use super::{GenerateRequest, Provider};
use crate::error::FusionError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// One queued outcome: text on success, message on failure
type Outcome = Result<String, String>;

pub struct MockProvider {
    /// Queue of outcomes to return (FIFO)
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
    /// Default response when queue is empty
    default_response: String,
    /// Delay before every response
    latency: Duration,
    /// Track all requests made (for assertions)
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            default_response: "Mock response".to_string(),
            latency: Duration::ZERO,
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        let provider = Self::new();
        for response in responses {
            provider.queue_response(response);
        }
        provider
    }

    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn queue_response(&self, response: impl Into<String>) {
        self.lock_outcomes().push_back(Ok(response.into()));
    }

    /// Queue a failure; the next call rejects with `FusionError::Provider`
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.lock_outcomes().push_back(Err(message.into()));
    }

    pub fn get_requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.get_requests().pop()
    }

    fn lock_outcomes(&self) -> std::sync::MutexGuard<'_, VecDeque<Outcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, FusionError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        // Dequeue before sleeping so overlapping calls keep FIFO order
        let outcome = self
            .lock_outcomes()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        outcome.map_err(FusionError::Provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let provider = MockProvider::new();
        let text = provider.generate(GenerateRequest::new("Hello")).await.unwrap();
        assert_eq!(text, "Mock response");
    }

    #[tokio::test]
    async fn test_mock_queued_outcomes() {
        let provider = MockProvider::with_responses(vec!["First".to_string()]);
        provider.queue_failure("boom");

        assert_eq!(provider.generate(GenerateRequest::new("a")).await.unwrap(), "First");
        let err = provider.generate(GenerateRequest::new("b")).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        // Default after queue empty
        assert_eq!(provider.generate(GenerateRequest::new("c")).await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let provider = MockProvider::new().with_default("Custom default");

        provider.generate(GenerateRequest::new("First prompt")).await.unwrap();
        provider
            .generate(GenerateRequest::new("Second prompt").with_model("m"))
            .await
            .unwrap();

        let requests = provider.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].prompt, "First prompt");
        assert_eq!(provider.last_request().unwrap().model.as_deref(), Some("m"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency() {
        let provider = MockProvider::new().with_latency(Duration::from_millis(200));
        let started = tokio::time::Instant::now();
        provider.generate(GenerateRequest::new("slow")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
