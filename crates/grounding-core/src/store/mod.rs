//! Lazily-initialized knowledge store.
//!
//! [`KnowledgeStore`] owns a [`CorpusLoader`] and an [`EmbeddingProvider`]
//! and turns them into an immutable [`KnowledgeBase`] on first use:
//!
//! ```text
//!  Uninitialized ──ensure()──▶ Initializing ──ok──▶ Ready (for the life of the store)
//!        ▲                          │
//!        └────── error / all callers cancelled
//! ```
//!
//! Exactly one load-and-embed attempt runs at a time. Callers that arrive
//! while an attempt is in flight await the same shared future and receive
//! the same outcome. A failed attempt leaves the store `Uninitialized`, so
//! the next call starts a fresh one.
//!
//! The store only keeps a weak handle to the in-flight attempt. The attempt
//! publishes its own outcome (`Ready` or `Uninitialized`) under the store
//! lock before it resolves, so a dead handle always means every caller
//! awaiting it was dropped (for example by a timeout). The attempt is dropped
//! with them and the store reads as `Uninitialized` again; it is never left
//! half-populated.

mod snapshot;

pub use snapshot::KnowledgeBase;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use tracing::{debug, info, warn};

use crate::corpus::CorpusLoader;
use crate::embedding::{embed_checked, EmbeddingProvider};
use crate::error::KnowledgeError;
use crate::index::VectorIndex;

/// Dimension recorded for an empty corpus when none is configured.
pub const DEFAULT_DIMENSION: usize = 1536;

type InitOutcome = Result<Arc<KnowledgeBase>, KnowledgeError>;
type InitFuture = BoxFuture<'static, InitOutcome>;

/// Observable lifecycle state of a [`KnowledgeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initializing,
    Ready,
}

enum State {
    Uninitialized,
    Initializing {
        attempt: u64,
        pending: WeakShared<InitFuture>,
    },
    Ready(Arc<KnowledgeBase>),
}

struct Inner {
    state: State,
    attempts: u64,
}

impl Inner {
    /// The attempt currently in flight, if any caller is still driving it.
    fn in_flight(&self) -> Option<Shared<InitFuture>> {
        match &self.state {
            State::Initializing { pending, .. } => pending.upgrade(),
            _ => None,
        }
    }
}

/// Process-wide handle to the embedded corpus.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct KnowledgeStore {
    loader: Arc<dyn CorpusLoader>,
    provider: Arc<dyn EmbeddingProvider>,
    default_dims: usize,
    inner: Arc<Mutex<Inner>>,
}

impl KnowledgeStore {
    pub fn new(loader: Arc<dyn CorpusLoader>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            loader,
            provider,
            default_dims: DEFAULT_DIMENSION,
            inner: Arc::new(Mutex::new(Inner {
                state: State::Uninitialized,
                attempts: 0,
            })),
        }
    }

    /// Dimension to record when the corpus turns out to be empty.
    pub fn with_default_dims(mut self, dims: usize) -> Self {
        self.default_dims = dims;
        self
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    pub fn loader(&self) -> &dyn CorpusLoader {
        self.loader.as_ref()
    }

    pub fn state(&self) -> StoreState {
        let inner = lock(&self.inner);
        match &inner.state {
            State::Ready(_) => StoreState::Ready,
            State::Initializing { .. } if inner.in_flight().is_some() => StoreState::Initializing,
            _ => StoreState::Uninitialized,
        }
    }

    /// The Ready knowledge base, without triggering initialization.
    pub fn snapshot(&self) -> Option<Arc<KnowledgeBase>> {
        match &lock(&self.inner).state {
            State::Ready(kb) => Some(Arc::clone(kb)),
            _ => None,
        }
    }

    /// Resolve the store to its Ready knowledge base.
    ///
    /// Loads and embeds the corpus on the first call. Concurrent callers
    /// share one attempt; once Ready, returns the cached base immediately.
    pub async fn ensure(&self) -> Result<Arc<KnowledgeBase>, KnowledgeError> {
        let pending = {
            let mut inner = lock(&self.inner);
            if let State::Ready(kb) = &inner.state {
                return Ok(Arc::clone(kb));
            }
            match inner.in_flight() {
                Some(pending) => {
                    debug!("joining in-flight knowledge store initialization");
                    pending
                }
                None => self.begin(&mut inner),
            }
        };

        pending.await
    }

    fn begin(&self, inner: &mut Inner) -> Shared<InitFuture> {
        inner.attempts += 1;
        let attempt = inner.attempts;
        info!(attempt, corpus = %self.loader.describe(), "initializing knowledge store");

        let store = Arc::clone(&self.inner);
        let init = initialize(
            Arc::clone(&self.loader),
            Arc::clone(&self.provider),
            self.default_dims,
        );
        let pending = async move {
            let outcome = init.await;
            settle(&store, attempt, &outcome);
            outcome
        }
        .boxed()
        .shared();

        inner.state = match pending.downgrade() {
            Some(weak) => State::Initializing {
                attempt,
                pending: weak,
            },
            None => State::Uninitialized,
        };
        pending
    }
}

/// Publish the outcome of `attempt` if it is still the current one.
fn settle(store: &Mutex<Inner>, attempt: u64, outcome: &InitOutcome) {
    let mut inner = lock(store);
    let current = matches!(
        &inner.state,
        State::Initializing { attempt: a, .. } if *a == attempt
    );
    if !current {
        return;
    }

    inner.state = match outcome {
        Ok(kb) => {
            info!(
                attempt,
                documents = kb.len(),
                dims = kb.dims(),
                loaded_at = %kb.loaded_at(),
                "knowledge store ready"
            );
            State::Ready(Arc::clone(kb))
        }
        Err(err) => {
            warn!(attempt, error = %err, "knowledge store initialization failed");
            State::Uninitialized
        }
    };
}

fn lock(store: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn initialize(
    loader: Arc<dyn CorpusLoader>,
    provider: Arc<dyn EmbeddingProvider>,
    default_dims: usize,
) -> InitOutcome {
    let documents = loader.load().await?;
    if documents.is_empty() {
        info!(dims = default_dims, "corpus is empty, skipping embedding pass");
        return Ok(Arc::new(KnowledgeBase::empty(default_dims)));
    }

    let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
    debug!(
        documents = texts.len(),
        model = provider.model_name(),
        "embedding corpus"
    );
    let embeddings = embed_checked(provider.as_ref(), &texts).await?;
    let index = VectorIndex::new(embeddings, default_dims)?;

    Ok(Arc::new(KnowledgeBase::new(documents, index)?))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::corpus::StaticCorpus;
    use crate::error::{CorpusLoadError, ProviderError};
    use crate::models::Document;
    use crate::testing::MockProvider;

    struct UnreadableCorpus;

    #[async_trait]
    impl CorpusLoader for UnreadableCorpus {
        fn describe(&self) -> String {
            "unreadable".to_string()
        }
        async fn load(&self) -> Result<Vec<Document>, CorpusLoadError> {
            Err(CorpusLoadError::new(
                "/srv/knowledge",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        }
    }

    fn corpus() -> Arc<StaticCorpus> {
        Arc::new(StaticCorpus::from_texts([
            ("budget.md", "# Budget\nSubmit an itemized budget with at least two quotes."),
            ("eligibility.md", "# Eligibility\nApplicants must be 18-35 and Namibian citizens."),
        ]))
    }

    #[tokio::test]
    async fn test_empty_corpus_skips_provider() {
        let provider = Arc::new(MockProvider::new());
        let store = KnowledgeStore::new(Arc::new(StaticCorpus::default()), provider.clone())
            .with_default_dims(768);

        let kb = store.ensure().await.unwrap();
        assert!(kb.is_empty());
        assert_eq!(kb.dims(), 768);
        assert_eq!(provider.calls(), 0);
        assert_eq!(store.state(), StoreState::Ready);
    }

    #[tokio::test]
    async fn test_ready_is_cached() {
        let provider = Arc::new(MockProvider::new());
        let store = KnowledgeStore::new(corpus(), provider.clone());
        assert_eq!(store.state(), StoreState::Uninitialized);
        assert!(store.snapshot().is_none());

        let first = store.ensure().await.unwrap();
        let second = store.ensure().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.batch_sizes(), vec![2]);
        assert!(store.snapshot().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cold_start_embeds_once() {
        let provider = Arc::new(MockProvider::new().with_delay(Duration::from_millis(50)));
        let store = Arc::new(KnowledgeStore::new(corpus(), provider.clone()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.ensure().await })
            })
            .collect();

        let mut bases = Vec::new();
        for handle in handles {
            bases.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(provider.calls(), 1);
        assert!(bases.iter().all(|kb| Arc::ptr_eq(kb, &bases[0])));
        assert_eq!(store.state(), StoreState::Ready);
    }

    #[tokio::test]
    async fn test_failed_initialization_is_retried() {
        let provider = Arc::new(MockProvider::new().failing_first(1));
        let store = KnowledgeStore::new(corpus(), provider.clone());

        let err = store.ensure().await.unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Provider(ProviderError::Api { status: 503, .. })
        ));
        assert_eq!(store.state(), StoreState::Uninitialized);

        let kb = store.ensure().await.unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(provider.calls(), 2);
        assert_eq!(store.state(), StoreState::Ready);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_waiters_share_failure() {
        let provider = Arc::new(
            MockProvider::new()
                .with_delay(Duration::from_millis(50))
                .failing_first(1),
        );
        let store = Arc::new(KnowledgeStore::new(corpus(), provider.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.ensure().await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_err());
        }
        assert_eq!(provider.calls(), 1);
        assert_eq!(store.state(), StoreState::Uninitialized);

        store.ensure().await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_corpus_error_is_not_empty_corpus() {
        let provider = Arc::new(MockProvider::new());
        let store = KnowledgeStore::new(Arc::new(UnreadableCorpus), provider.clone());

        let err = store.ensure().await.unwrap_err();
        assert!(matches!(err, KnowledgeError::CorpusLoad(_)));
        assert_eq!(provider.calls(), 0);
        assert_eq!(store.state(), StoreState::Uninitialized);
    }

    #[tokio::test]
    async fn test_count_mismatch_rejects_whole_batch() {
        let provider = Arc::new(MockProvider::new().dropping_last_vector());
        let store = KnowledgeStore::new(corpus(), provider.clone());

        let err = store.ensure().await.unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Provider(ProviderError::CountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_attempt_publishes_ready_before_resolving() {
        let provider = Arc::new(MockProvider::new());
        let store = KnowledgeStore::new(corpus(), provider.clone());

        let pending = {
            let mut inner = lock(&store.inner);
            store.begin(&mut inner)
        };
        assert_eq!(store.state(), StoreState::Initializing);

        // Awaiting the last strong handle kills the weak one; the store must
        // already be Ready by then.
        let kb = pending.await.unwrap();
        assert_eq!(store.state(), StoreState::Ready);
        assert!(Arc::ptr_eq(&store.snapshot().unwrap(), &kb));

        let again = store.ensure().await.unwrap();
        assert!(Arc::ptr_eq(&again, &kb));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_attempt_publishes_failure_before_resolving() {
        let provider = Arc::new(MockProvider::new().failing_first(1));
        let store = KnowledgeStore::new(corpus(), provider.clone());

        let pending = {
            let mut inner = lock(&store.inner);
            store.begin(&mut inner)
        };
        assert!(pending.await.is_err());
        assert_eq!(store.state(), StoreState::Uninitialized);

        store.ensure().await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_ready_base_keeps_its_load_time() {
        let before = Utc::now();
        let store = KnowledgeStore::new(corpus(), Arc::new(MockProvider::new()));

        let first = store.ensure().await.unwrap();
        let loaded_at = first.loaded_at();
        assert!(loaded_at >= before);
        assert!(loaded_at <= Utc::now());

        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = store.ensure().await.unwrap();
        assert_eq!(second.loaded_at(), loaded_at);
    }

    #[tokio::test]
    async fn test_cancelled_cold_start_leaves_store_uninitialized() {
        let provider = Arc::new(MockProvider::new().with_delay(Duration::from_millis(100)));
        let store = KnowledgeStore::new(corpus(), provider.clone());

        let timed_out = tokio::time::timeout(Duration::from_millis(10), store.ensure()).await;
        assert!(timed_out.is_err());
        assert_eq!(store.state(), StoreState::Uninitialized);
        assert!(store.snapshot().is_none());

        let kb = store.ensure().await.unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(provider.calls(), 2);
    }
}
