//! # Task Runner Tests
//!
//! Observable behavior of `TaskRunner` across overlapping invocations:
//! - pending clears result and failure
//! - exactly one of result/failure is set after settlement
//! - the invocation that settles last decides the final state
//! - provider failures are captured, never propagated

use fusion::provider::MockProvider;
use fusion::runner::GENERIC_FAILURE;
use fusion::{
    from_fn, BlogPost, BlogPostWriter, DataInsights, FusionError, QuarterlyFigure, TaskPhase,
    TaskRunner,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

// ============================================================================
// TEST HELPERS
// ============================================================================

fn sleeper() -> TaskRunner<(&'static str, u64), String> {
    TaskRunner::new(from_fn(|(name, ms): (&'static str, u64)| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(name.to_string())
    }))
}

type Gate = oneshot::Receiver<Result<u32, String>>;

/// Runner whose invocations settle when the test says so
fn gated() -> TaskRunner<Gate, u32> {
    TaskRunner::new(from_fn(|gate: Gate| async move {
        match gate.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(FusionError::Provider(message)),
            Err(_) => Err(FusionError::Provider("gate dropped".to_string())),
        }
    }))
}

// ============================================================================
// RACE: LAST SETTLEMENT WINS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_first_call_overwrites_fast_second_call() {
    let runner = sleeper();

    let a = runner.spawn(("A", 200));
    let b = runner.spawn(("B", 50));

    tokio::time::sleep(Duration::from_millis(60)).await;
    // B settled while A is still in flight: no longer pending
    let state = runner.state();
    assert_eq!(state.phase(), TaskPhase::Succeeded);
    assert_eq!(state.result().map(String::as_str), Some("B"));

    a.await.unwrap();
    b.await.unwrap();
    assert_eq!(runner.state().result().map(String::as_str), Some("A"));
}

#[tokio::test]
async fn test_failure_settling_last_clears_earlier_result() {
    let runner = gated();
    let (tx_ok, rx_ok) = oneshot::channel();
    let (tx_err, rx_err) = oneshot::channel();

    let first = runner.spawn(rx_err);
    let second = runner.spawn(rx_ok);

    tx_ok.send(Ok(7)).unwrap();
    second.await.unwrap();
    assert_eq!(runner.state().result(), Some(&7));

    tx_err.send(Err("late failure".to_string())).unwrap();
    first.await.unwrap();

    let state = runner.state();
    assert_eq!(state.phase(), TaskPhase::Failed);
    assert_eq!(state.failure(), Some("late failure"));
    assert!(state.result().is_none());
}

fn settlement_order() -> impl Strategy<Value = (Vec<usize>, Vec<bool>)> {
    (2usize..6).prop_flat_map(|n| {
        (
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            proptest::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    #[test]
    fn prop_last_settlement_decides_state((order, succeeds) in settlement_order()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let runner = gated();
            let mut gates = Vec::new();
            let mut handles = Vec::new();
            for _ in 0..order.len() {
                let (tx, rx) = oneshot::channel();
                gates.push(Some(tx));
                handles.push(Some(runner.spawn(rx)));
            }
            assert!(runner.state().is_pending());

            for &i in &order {
                let outcome = if succeeds[i] { Ok(i as u32) } else { Err(format!("call {} failed", i)) };
                gates[i].take().unwrap().send(outcome).unwrap();
                handles[i].take().unwrap().await.unwrap();

                let state = runner.state();
                assert!(!state.is_pending());
                if succeeds[i] {
                    assert_eq!(state.result(), Some(&(i as u32)));
                    assert!(state.failure().is_none());
                } else {
                    assert_eq!(state.failure(), Some(format!("call {} failed", i).as_str()));
                    assert!(state.result().is_none());
                }
            }
        });
    }
}

// ============================================================================
// PENDING INVARIANT
// ============================================================================

#[tokio::test]
async fn test_every_published_state_is_consistent() {
    let runner = gated();
    let mut rx = runner.subscribe();

    let (tx, gate) = oneshot::channel();
    let handle = runner.spawn(gate);

    rx.changed().await.unwrap();
    {
        let state = rx.borrow_and_update();
        assert!(state.is_pending());
        assert!(state.result().is_none() && state.failure().is_none());
    }

    tx.send(Ok(1)).unwrap();
    handle.await.unwrap();
    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    assert!(!state.is_pending());
    assert!(state.result().is_some() ^ state.failure().is_some());
}

// ============================================================================
// OPERATIONS THROUGH THE RUNNER
// ============================================================================

#[tokio::test]
async fn test_missing_api_key_is_captured_as_failure() {
    let config = fusion::FusionConfig::from_lookup(|_| None);
    let provider = fusion::create_provider("gemini", &config).unwrap();
    let runner = TaskRunner::new(DataInsights::new(provider));

    runner.execute(fusion::operations::quarterly_dataset()).await;

    let state = runner.state();
    assert_eq!(
        state.failure(),
        Some("Gemini API key not configured. This feature is disabled.")
    );
    assert!(state.result().is_none());
}

#[tokio::test]
async fn test_blank_provider_error_gets_generic_message() {
    let mock = MockProvider::new();
    mock.queue_failure("   ");
    let runner: TaskRunner<Vec<QuarterlyFigure>, String> =
        TaskRunner::new(DataInsights::new(Arc::new(mock)));

    runner.execute(Vec::new()).await;
    assert_eq!(runner.state().failure(), Some(GENERIC_FAILURE));
}

#[tokio::test]
async fn test_blog_shape_error_is_a_result_not_a_failure() {
    let mock = Arc::new(MockProvider::new().with_default("<html>not json</html>"));
    let runner = TaskRunner::new(BlogPostWriter::new(mock));

    runner.execute("Rust".to_string()).await;

    let state = runner.state();
    assert_eq!(state.result(), Some(&BlogPost::fallback()));
    assert!(state.failure().is_none());
}
