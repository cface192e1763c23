//! In-memory persistence sink.

use super::{BoxFuture, PersistError, PersistRequest, PersistResult, PersistenceSink};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory sink for testing and offline use.
///
/// Records every request it accepts. With [`fail_with`](Self::fail_with) set,
/// it rejects everything with that error instead.
#[derive(Default)]
pub struct MemoryPersistence {
    received: RwLock<Vec<PersistRequest>>,
    failure: RwLock<Option<PersistError>>,
    attempts: AtomicUsize,
}

impl MemoryPersistence {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following request fail with `error`, or succeed again with `None`.
    pub fn fail_with(&self, error: Option<PersistError>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = error;
        }
    }

    /// Requests accepted so far, in arrival order.
    pub fn received(&self) -> Vec<PersistRequest> {
        self.received.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests seen, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl PersistenceSink for MemoryPersistence {
    fn apply(&self, request: &PersistRequest) -> BoxFuture<'_, PersistResult<()>> {
        let request = request.clone();
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            let failure = self
                .failure
                .read()
                .map_err(|e| PersistError::Transport(format!("Lock error: {}", e)))?
                .clone();
            if let Some(error) = failure {
                return Err(error);
            }
            let mut received = self
                .received
                .write()
                .map_err(|e| PersistError::Transport(format!("Lock error: {}", e)))?;
            received.push(request);
            Ok(())
        })
    }
}
