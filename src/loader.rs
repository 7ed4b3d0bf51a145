//! View Loader - deferred module registry
//!
//! Maps a view path to its module, resolving each path at most once for the
//! lifetime of the loader. Outcomes (success or failure) are memoized.
//!
//! ```text
//!   poll(path) ──► no slot ──► create slot, spawn resolve ──► Pending
//!              ──► slot, not settled ─────────────────────────► Pending
//!              ──► slot, Ok(module) ──────────────────────────► Ready(module)
//!              ──► slot, Err(reason) ─────────────────────────► Failed(ViewLoad)
//! ```
//!
//! Slots live in a `DashMap`; each slot is a `tokio::sync::OnceCell`, so
//! concurrent requests for the same path share a single resolution.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::FutureExt;
use tokio::sync::OnceCell;

use crate::error::FusionError;

/// Produces the module for a path
#[async_trait]
pub trait ModuleResolver<M: ?Sized>: Send + Sync {
    async fn resolve(&self, path: &str) -> Result<Arc<M>, FusionError>;
}

type Slot<M> = Arc<OnceCell<Result<Arc<M>, String>>>;

#[derive(Debug)]
pub enum LoadStatus<M: ?Sized> {
    Pending,
    Ready(Arc<M>),
    Failed(FusionError),
}

pub struct ViewLoader<M: ?Sized> {
    resolver: Arc<dyn ModuleResolver<M>>,
    slots: Arc<DashMap<String, Slot<M>>>,
    resolutions: Arc<AtomicUsize>,
}

impl<M: ?Sized> Clone for ViewLoader<M> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            slots: Arc::clone(&self.slots),
            resolutions: Arc::clone(&self.resolutions),
        }
    }
}

impl<M> ViewLoader<M>
where
    M: ?Sized + Send + Sync + 'static,
{
    pub fn new(resolver: impl ModuleResolver<M> + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
            slots: Arc::new(DashMap::new()),
            resolutions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Non-blocking lookup; schedules resolution on first request
    ///
    /// Must be called from within a tokio runtime.
    pub fn poll(&self, path: &str) -> LoadStatus<M> {
        let (slot, created) = self.slot(path);

        if let Some(outcome) = slot.get() {
            return Self::status(path, outcome);
        }

        if created {
            let loader = self.clone();
            let path = path.to_string();
            tokio::spawn(async move {
                // Outcome is memoized in the slot; poll picks it up
                let _ = loader.resolve(&path).await;
            });
        }

        LoadStatus::Pending
    }

    /// Await the module for `path`, resolving it if nobody has yet
    pub async fn resolve(&self, path: &str) -> Result<Arc<M>, FusionError> {
        let (slot, _) = self.slot(path);
        let outcome = slot.get_or_init(|| self.run_resolver(path)).await;
        outcome.clone().map_err(|reason| FusionError::ViewLoad {
            path: path.to_string(),
            reason,
        })
    }

    pub fn is_resolved(&self, path: &str) -> bool {
        self.slots
            .get(path)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }

    /// Number of resolver invocations so far
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    fn slot(&self, path: &str) -> (Slot<M>, bool) {
        use dashmap::mapref::entry::Entry;

        match self.slots.entry(path.to_string()) {
            Entry::Occupied(e) => (Arc::clone(e.get()), false),
            Entry::Vacant(e) => {
                let slot: Slot<M> = Arc::new(OnceCell::new());
                e.insert(Arc::clone(&slot));
                (slot, true)
            }
        }
    }

    async fn run_resolver(&self, path: &str) -> Result<Arc<M>, String> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %path, "resolving view module");

        // A panicking resolver settles the slot as a failure
        let attempt = AssertUnwindSafe(self.resolver.resolve(path))
            .catch_unwind()
            .await;
        let outcome = match attempt {
            Ok(outcome) => outcome,
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                tracing::error!(path = %path, panic = %reason, "view module resolver panicked");
                return Err(reason);
            }
        };

        match outcome {
            Ok(module) => {
                tracing::info!(path = %path, "view module loaded");
                Ok(module)
            }
            Err(error) => {
                tracing::error!(path = %path, error = %error, "view module failed to load");
                Err(match error {
                    FusionError::ViewLoad { reason, .. } => reason,
                    other => other.to_string(),
                })
            }
        }
    }

    fn status(path: &str, outcome: &Result<Arc<M>, String>) -> LoadStatus<M> {
        match outcome {
            Ok(module) => LoadStatus::Ready(Arc::clone(module)),
            Err(reason) => LoadStatus::Failed(FusionError::ViewLoad {
                path: path.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("resolver panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("resolver panicked: {}", s)
    } else {
        "resolver panicked".to_string()
    }
}
