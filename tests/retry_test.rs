use small_kit::core::retry::{retry_with_policy, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[tokio::test]
async fn test_first_success_needs_no_retry() {
    let attempts = AtomicU32::new(0);
    let policy = RetryPolicy::default();

    let result: Result<&str, String> = retry_with_policy(&policy, |attempt| {
        attempts.store(attempt, Ordering::SeqCst);
        async { Ok("done") }
    })
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_transient_failures() {
    let attempts = AtomicU32::new(0);
    let policy = RetryPolicy::fixed(5, 10);

    let result: Result<u32, String> = retry_with_policy(&policy, |attempt| {
        attempts.store(attempt, Ordering::SeqCst);
        async move {
            if attempt < 3 {
                Err(format!("transient {}", attempt))
            } else {
                Ok(attempt * 100)
            }
        }
    })
    .await;

    assert_eq!(result, Ok(300));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_returns_last_error_when_attempts_run_out() {
    let attempts = AtomicU32::new(0);
    let policy = RetryPolicy::fixed(3, 10);

    let result: Result<(), String> = retry_with_policy(&policy, |attempt| {
        attempts.store(attempt, Ordering::SeqCst);
        async move { Err(format!("failure {}", attempt)) }
    })
    .await;

    assert_eq!(result, Err("failure 3".to_string()));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_waits_follow_the_backoff_schedule() {
    let policy = RetryPolicy {
        max_attempts: 4,
        initial_delay_ms: 100,
        backoff_factor: 2.0,
        max_delay_ms: 10_000,
    };

    let started = tokio::time::Instant::now();
    let offsets: Mutex<Vec<Duration>> = Mutex::new(Vec::new());

    let result: Result<(), String> = retry_with_policy(&policy, |attempt| {
        offsets.lock().unwrap().push(started.elapsed());
        async move { Err(format!("failure {}", attempt)) }
    })
    .await;

    assert!(result.is_err());

    // 各次嘗試的起點：0ms、100ms、300ms、700ms，間隔依 100→200→400 退避
    // （暫停時鐘下精確成立）
    let offsets = offsets.into_inner().unwrap();
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_millis(100),
            Duration::from_millis(300),
            Duration::from_millis(700),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_delay_is_capped_by_max_delay() {
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_delay_ms: 100,
        backoff_factor: 10.0,
        max_delay_ms: 150,
    };

    let started = tokio::time::Instant::now();
    let result: Result<(), String> =
        retry_with_policy(&policy, |_| async { Err("nope".to_string()) }).await;

    assert!(result.is_err());
    // 100 + 150（第二段被 150ms 上限封頂）
    assert_eq!(started.elapsed(), Duration::from_millis(250));
}

#[tokio::test]
async fn test_zero_max_attempts_still_runs_once() {
    let attempts = AtomicU32::new(0);
    let policy = RetryPolicy::default().with_max_attempts(0);

    let result: Result<(), String> = retry_with_policy(&policy, |attempt| {
        attempts.store(attempt, Ordering::SeqCst);
        async { Err("nope".to_string()) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
