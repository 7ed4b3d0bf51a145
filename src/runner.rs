//! Async Task Runner
//!
//! Wraps any async [`Operation`] into a `{result, pending, failure}` triad
//! ([`TaskState`]) plus an `execute` trigger.
//!
//! ```text
//!   execute(p) ──► TaskState::pending() ──► operation.invoke(p).await
//!                                                │
//!                         Ok(v) ◄────────────────┴────────────► Err(e)
//!                 TaskState::succeeded(v)              TaskState::failed(msg)
//! ```
//!
//! Invocations carry no identity. If `execute` is called again before an
//! earlier call settles, both completions write the same state and the call
//! that settles last wins, whatever order they were started in.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::FusionError;

/// Shown when an operation fails with a blank message
pub const GENERIC_FAILURE: &str = "An unexpected error occurred while calling the provider.";

// ─────────────────────────────────────────────────────────────────────────────
// Operation
// ─────────────────────────────────────────────────────────────────────────────

/// Single-method capability wrapped by a [`TaskRunner`]
#[async_trait]
pub trait Operation<P, T>: Send + Sync {
    async fn invoke(&self, params: P) -> Result<T, FusionError>;
}

/// Adapter turning an async closure into an [`Operation`]
pub struct FnOperation<F, P> {
    f: F,
    _params: PhantomData<fn(P)>,
}

/// Wrap `f` as an [`Operation`]
pub fn from_fn<F, P, T, Fut>(f: F) -> FnOperation<F, P>
where
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, FusionError>> + Send,
{
    FnOperation {
        f,
        _params: PhantomData,
    }
}

#[async_trait]
impl<F, P, T, Fut> Operation<P, T> for FnOperation<F, P>
where
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, FusionError>> + Send,
    P: Send + 'static,
    T: Send + 'static,
{
    async fn invoke(&self, params: P) -> Result<T, FusionError> {
        (self.f)(params).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// State of one asynchronous operation
///
/// Fields are private: the constructors are the only way to build a state,
/// so `result` and `failure` are never both set and both are empty while
/// `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskState<T> {
    result: Option<T>,
    pending: bool,
    failure: Option<String>,
}

impl<T> Default for TaskState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> TaskState<T> {
    /// Never-invoked state
    pub fn idle() -> Self {
        Self {
            result: None,
            pending: false,
            failure: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            result: None,
            pending: true,
            failure: None,
        }
    }

    pub fn succeeded(value: T) -> Self {
        Self {
            result: Some(value),
            pending: false,
            failure: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: None,
            pending: false,
            failure: Some(message.into()),
        }
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn phase(&self) -> TaskPhase {
        match (self.pending, &self.result, &self.failure) {
            (true, _, _) => TaskPhase::Pending,
            (false, Some(_), _) => TaskPhase::Succeeded,
            (false, None, Some(_)) => TaskPhase::Failed,
            (false, None, None) => TaskPhase::Idle,
        }
    }
}

/// Human-readable message for a failed invocation
pub fn failure_message(error: &FusionError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task Runner
// ─────────────────────────────────────────────────────────────────────────────

/// Reactive wrapper around one [`Operation`]
///
/// Cloning is cheap and clones share the same state, so a view can hand a
/// clone to a spawned task.
pub struct TaskRunner<P, T> {
    operation: Arc<dyn Operation<P, T>>,
    state: Arc<watch::Sender<TaskState<T>>>,
}

impl<P, T> Clone for TaskRunner<P, T> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            state: Arc::clone(&self.state),
        }
    }
}

impl<P, T> TaskRunner<P, T>
where
    P: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(operation: impl Operation<P, T> + 'static) -> Self {
        Self::from_arc(Arc::new(operation))
    }

    pub fn from_arc(operation: Arc<dyn Operation<P, T>>) -> Self {
        let (tx, _rx) = watch::channel(TaskState::idle());
        Self {
            operation,
            state: Arc::new(tx),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> TaskState<T> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state replacement
    pub fn subscribe(&self) -> watch::Receiver<TaskState<T>> {
        self.state.subscribe()
    }

    /// Run the operation once and record its outcome
    ///
    /// Never fails: operation errors land in [`TaskState::failure`].
    pub async fn execute(&self, params: P) {
        self.state.send_replace(TaskState::pending());

        let next = match self.operation.invoke(params).await {
            Ok(value) => TaskState::succeeded(value),
            Err(error) => {
                tracing::debug!(error = %error, "task operation failed");
                TaskState::failed(failure_message(&error))
            }
        };

        self.state.send_replace(next);
    }

    /// Fire-and-forget [`execute`](Self::execute) on the tokio runtime
    ///
    /// The pending transition is applied before this returns, so a render
    /// right after `spawn` already shows the in-flight state.
    pub fn spawn(&self, params: P) -> JoinHandle<()> {
        self.state.send_replace(TaskState::pending());
        let runner = self.clone();
        tokio::spawn(async move { runner.execute(params).await })
    }
}
