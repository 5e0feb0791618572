//! Test doubles shared by the unit tests of this crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::ProviderError;

const VOCABULARY: &[&str] = &[
    "age",
    "must",
    "be",
    "budget",
    "quotes",
    "eligibility",
    "citizens",
    "deadline",
];

/// Bag-of-words embedder over a fixed vocabulary that records its calls.
pub(crate) struct MockProvider {
    calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
    delay: Option<Duration>,
    failures_left: AtomicUsize,
    drop_last: bool,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
            delay: None,
            failures_left: AtomicUsize::new(0),
            drop_last: false,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer the first `n` calls with a 503.
    pub(crate) fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Return one vector fewer than requested.
    pub(crate) fn dropping_last_vector(mut self) -> Self {
        self.drop_last = true;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    pub(crate) fn vectorize(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        VOCABULARY
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockProvider {
    fn model_name(&self) -> &str {
        "mock-bag-of-words"
    }

    fn dims(&self) -> usize {
        VOCABULARY.len()
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(texts.len());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ProviderError::Api {
                status: 503,
                body: "upstream unavailable".to_string(),
            });
        }

        let mut vectors: Vec<Vec<f32>> = texts.iter().map(|t| Self::vectorize(t)).collect();
        if self.drop_last {
            vectors.pop();
        }
        Ok(vectors)
    }
}
