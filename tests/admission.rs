//! Concurrency properties of the admission controller, driven on the paused
//! tokio clock so the window arithmetic is deterministic.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use binance_api_client::error::BinanceError;
use binance_api_client::rate_limit::{
    AdmissionController, RateLimitDescriptor, RateLimitInterval, RateLimitKind,
};

fn weight_rule(interval: RateLimitInterval, interval_num: u32, limit: u32) -> RateLimitDescriptor {
    RateLimitDescriptor::new(RateLimitKind::RequestWeight, interval, interval_num, limit)
}

#[tokio::test(start_paused = true)]
async fn test_sequential_admissions_never_exceed_window() {
    // 10 weight units per second; five requests of weight 4 need three windows.
    let controller =
        AdmissionController::from_descriptors(&[weight_rule(RateLimitInterval::Second, 1, 10)]);

    let start = Instant::now();
    let mut completions = Vec::new();
    for _ in 0..5 {
        controller.admit(4).await.unwrap();
        completions.push(Instant::now() - start);
    }

    // Two admissions fit the first window, two the second, one the third.
    assert!(completions[1] < Duration::from_secs(1));
    assert!(completions[2] >= Duration::from_secs(1));
    assert!(completions[3] < Duration::from_secs(2));
    assert!(completions[4] >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_admissions_never_exceed_window() {
    const WEIGHT: u32 = 4;
    const LIMIT: u32 = 10;
    const TASKS: usize = 5;

    let controller = Arc::new(AdmissionController::from_descriptors(&[weight_rule(
        RateLimitInterval::Second,
        1,
        LIMIT,
    )]));

    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let controller = controller.clone();
        handles.push(tokio::spawn(async move {
            controller.admit(WEIGHT).await.unwrap();
            Instant::now() - start
        }));
    }

    let mut completions = Vec::new();
    for handle in handles {
        completions.push(handle.await.unwrap());
    }
    completions.sort();

    // Within any sliding one-second window, admitted weight stays under the
    // limit: for each admission, count the admissions that follow within one
    // window of it.
    for (i, &at) in completions.iter().enumerate() {
        let in_window = completions[i..]
            .iter()
            .take_while(|&&later| later < at + Duration::from_secs(1))
            .count() as u32;
        assert!(
            in_window * WEIGHT <= LIMIT,
            "admitted {} weight units within one window",
            in_window * WEIGHT
        );
    }

    // All five eventually complete, no starvation beyond the refill cadence.
    assert!(completions[TASKS - 1] <= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_composed_gates_respect_most_restrictive() {
    // A per-second burst gate composed with a per-minute budget.
    let controller = Arc::new(AdmissionController::from_descriptors(&[
        weight_rule(RateLimitInterval::Second, 1, 10),
        weight_rule(RateLimitInterval::Minute, 1, 25),
    ]));

    let start = Instant::now();

    // Four requests of weight 10: the burst gate spaces them one per second,
    // and after 25 weight units the minute gate takes over.
    for _ in 0..2 {
        controller.admit(10).await.unwrap();
    }
    assert!(Instant::now() - start >= Duration::from_secs(1));

    // Third request exhausts the minute budget's remaining 5 only at the
    // next minute window.
    controller.admit(10).await.unwrap();
    assert!(Instant::now() - start >= Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_unsatisfiable_weight_fails_before_waiting() {
    let controller = AdmissionController::from_descriptors(&[
        weight_rule(RateLimitInterval::Second, 1, 10),
        weight_rule(RateLimitInterval::Minute, 1, 6000),
    ]);

    let start = Instant::now();
    let error = controller.admit(11).await.unwrap_err();

    assert!(matches!(error, BinanceError::Config(_)));
    // Raised immediately, not after a window wait.
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_leaks_no_tokens() {
    let controller = Arc::new(AdmissionController::from_descriptors(&[weight_rule(
        RateLimitInterval::Second,
        1,
        10,
    )]));

    controller.admit(10).await.unwrap();

    // A waiter blocked on the exhausted gate is abandoned mid-wait.
    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.admit(10).await }
    });
    tokio::task::yield_now().await;
    pending.abort();
    let _ = pending.await;

    // The abandoned wait consumed nothing: after the window rolls over the
    // full capacity is available again.
    tokio::time::advance(Duration::from_secs(1)).await;
    let start = Instant::now();
    controller.admit(10).await.unwrap();
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

// The raw-request limiter waits on its own monotonic clock, so this test
// runs in real time rather than on the paused tokio clock.
#[tokio::test]
async fn test_raw_request_rule_composes_with_weight_gates() {
    // Two raw requests per second alongside a generous weight budget: the
    // third call in the same instant must wait for the raw limiter.
    let controller = AdmissionController::from_descriptors(&[
        weight_rule(RateLimitInterval::Minute, 1, 6000),
        RateLimitDescriptor::new(RateLimitKind::RawRequests, RateLimitInterval::Second, 1, 2),
    ]);

    let start = std::time::Instant::now();
    controller.admit(1).await.unwrap();
    controller.admit(1).await.unwrap();
    controller.admit(1).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(400));
}
