//! Failure Supervisor
//!
//! Wraps a render attempt so that a failure (an `Err` or a panic) inside the
//! supervised region is captured here instead of reaching the caller.
//!
//! ```text
//!   Healthy ── attempt fails ──► Failed ── retry() ──► Healthy
//!      ▲                                                  │
//!      └──────────────── attempt succeeds ◄───────────────┘
//! ```
//!
//! While `Failed`, attempts are not run and the caller draws the fallback.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::FusionError;

/// Failure captured from a supervised attempt
#[derive(Debug, Clone)]
pub struct CapturedFailure {
    pub message: String,
}

impl CapturedFailure {
    fn from_error(error: &FusionError) -> Self {
        Self {
            message: error.to_string(),
        }
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { message }
    }
}

#[derive(Debug, Clone, Default)]
pub enum SupervisorState {
    #[default]
    Healthy,
    Failed(CapturedFailure),
}

/// Outcome of [`Supervisor::supervise`]
#[derive(Debug)]
pub enum Supervised<T> {
    Rendered(T),
    Fallback,
}

impl<T> Supervised<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

#[derive(Debug, Default)]
pub struct Supervisor {
    name: &'static str,
    state: SupervisorState,
    failures: u32,
}

impl Supervisor {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: SupervisorState::Healthy,
            failures: 0,
        }
    }

    pub fn state(&self) -> &SupervisorState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, SupervisorState::Failed(_))
    }

    /// Number of transitions into `Failed` so far
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    /// Run `attempt` unless failed; capture any error or panic it raises
    pub fn supervise<T, F>(&mut self, attempt: F) -> Supervised<T>
    where
        F: FnOnce() -> Result<T, FusionError>,
    {
        if self.is_failed() {
            return Supervised::Fallback;
        }

        let failure = match catch_unwind(AssertUnwindSafe(attempt)) {
            Ok(Ok(value)) => return Supervised::Rendered(value),
            Ok(Err(error)) => CapturedFailure::from_error(&error),
            Err(payload) => CapturedFailure::from_panic(payload),
        };

        tracing::error!(
            region = self.name,
            error = %failure.message,
            "Uncaught render error, showing fallback"
        );
        self.failures += 1;
        self.state = SupervisorState::Failed(failure);
        Supervised::Fallback
    }

    /// Return to `Healthy` so the next attempt runs again
    pub fn retry(&mut self) {
        if self.is_failed() {
            tracing::info!(region = self.name, "retrying supervised region");
        }
        self.state = SupervisorState::Healthy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Result<(), FusionError> {
        Err(FusionError::Render("boom".to_string()))
    }

    #[test]
    fn test_success_passes_through() {
        let mut sup = Supervisor::new("test");
        let out = sup.supervise(|| Ok(42));
        assert!(matches!(out, Supervised::Rendered(42)));
        assert!(!sup.is_failed());
    }

    #[test]
    fn test_error_transitions_to_failed() {
        let mut sup = Supervisor::new("test");
        assert!(sup.supervise(failing).is_fallback());
        match sup.state() {
            SupervisorState::Failed(f) => assert_eq!(f.message, "Render error: boom"),
            SupervisorState::Healthy => panic!("expected Failed"),
        }
    }

    #[test]
    fn test_failed_does_not_rerun_attempt() {
        let mut sup = Supervisor::new("test");
        sup.supervise(failing);

        let mut ran = false;
        let out = sup.supervise(|| {
            ran = true;
            Ok(())
        });
        assert!(out.is_fallback());
        assert!(!ran);
    }

    #[test]
    fn test_retry_then_same_failure_fails_again() {
        let mut sup = Supervisor::new("test");
        sup.supervise(failing);
        sup.retry();
        assert!(!sup.is_failed());

        sup.supervise(failing);
        assert!(sup.is_failed());
        assert_eq!(sup.failure_count(), 2);
    }

    #[test]
    fn test_retry_then_success_stays_healthy() {
        let mut sup = Supervisor::new("test");
        sup.supervise(failing);
        sup.retry();
        assert!(matches!(sup.supervise(|| Ok("ok")), Supervised::Rendered("ok")));
        assert!(!sup.is_failed());
    }

    #[test]
    fn test_panic_is_captured() {
        let mut sup = Supervisor::new("test");
        let out: Supervised<()> = sup.supervise(|| panic!("widget exploded"));
        assert!(out.is_fallback());
        match sup.state() {
            SupervisorState::Failed(f) => assert_eq!(f.message, "widget exploded"),
            SupervisorState::Healthy => panic!("expected Failed"),
        }
    }
}
