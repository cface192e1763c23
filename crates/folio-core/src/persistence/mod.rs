//! Outbound persistence contract.
//!
//! Completed gestures queue one request per mutated entity. The host drains
//! the queue and hands it to a [`PersistenceSink`]; nothing in the engine
//! waits for acknowledgement.

mod memory;

pub use memory::MemoryPersistence;

use crate::document::{ElementGeometry, ElementId, PageId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Update rejected: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One geometry update for the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PersistRequest {
    UpdatePagePosition { page: PageId, position: Point },
    UpdateElement { element: ElementId, geometry: ElementGeometry },
}

impl PersistRequest {
    /// ID of the entity this request updates.
    pub fn entity(&self) -> uuid::Uuid {
        match self {
            PersistRequest::UpdatePagePosition { page, .. } => *page,
            PersistRequest::UpdateElement { element, .. } => *element,
        }
    }
}

/// Receiver of geometry updates.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait PersistenceSink: Send + Sync {
    /// Apply one update.
    fn apply(&self, request: &PersistRequest) -> BoxFuture<'_, PersistResult<()>>;
}

/// Receiver of geometry updates (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait PersistenceSink {
    /// Apply one update.
    fn apply(&self, request: &PersistRequest) -> BoxFuture<'_, PersistResult<()>>;
}

/// Outcome of one [`dispatch`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub failed: usize,
}

/// Send every request in order. Failures are logged and not retried.
pub async fn dispatch<S>(requests: Vec<PersistRequest>, sink: &S) -> DispatchSummary
where
    S: PersistenceSink + ?Sized,
{
    let mut summary = DispatchSummary::default();
    for request in requests {
        match sink.apply(&request).await {
            Ok(()) => summary.delivered += 1,
            Err(e) => {
                log::warn!("Failed to persist {:?}: {}", request, e);
                summary.failed += 1;
            }
        }
    }
    summary
}
