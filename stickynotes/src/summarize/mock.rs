//! Scripted summarizer for tests and offline use

use super::{SummaryBounds, Summarizer};
use crate::error::SummarizationError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    scripted: VecDeque<std::result::Result<String, SummarizationError>>,
    calls: Vec<String>,
}

/// Returns scripted outcomes in order, then falls back to the first words of
/// the input
#[derive(Debug, Clone, Default)]
pub struct MockSummarizer {
    state: Arc<Mutex<MockState>>,
    latency: Duration,
}

impl MockSummarizer {
    /// Create a mock with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful summary
    pub fn with_response(self, summary: impl Into<String>) -> Self {
        self.push(Ok(summary.into()));
        self
    }

    /// Queue a failure
    pub fn with_failure(self, error: SummarizationError) -> Self {
        self.push(Err(error));
        self
    }

    /// Delay every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Inputs received so far
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn push(&self, outcome: std::result::Result<String, SummarizationError>) {
        self.lock().scripted.push_back(outcome);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> std::result::Result<String, SummarizationError> {
        let scripted = {
            let mut state = self.lock();
            state.calls.push(text.to_string());
            state.scripted.pop_front()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        scripted.unwrap_or_else(|| {
            let words: Vec<&str> = text
                .split_whitespace()
                .take(bounds.max_length as usize)
                .collect();
            Ok(words.join(" "))
        })
    }
}
