use small_kit::{Debouncer, Throttler};
use std::time::Duration;
use tokio::sync::mpsc;

// 計時測試全部跑在暫停的 tokio 時鐘上，sleep 立即推進，不吃牆鐘時間

fn collecting_debouncer(delay_ms: u64) -> (Debouncer<u32>, mpsc::UnboundedReceiver<u32>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move |arg: u32| {
        let _ = tx.send(arg);
    });
    (debouncer, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<u32>) -> Vec<u32> {
    let mut seen = Vec::new();
    while let Ok(arg) = rx.try_recv() {
        seen.push(arg);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_debounce_fires_once_with_last_argument() {
    let (mut debouncer, mut rx) = collecting_debouncer(50);
    assert_eq!(debouncer.delay(), Duration::from_millis(50));

    for arg in 1..=4u32 {
        debouncer.call(arg);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // 安靜期還沒過完
    assert!(drain(&mut rx).is_empty());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(drain(&mut rx), vec![4]);

    // 之後不會再多跑
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_debounce_rearms_on_every_call() {
    let (mut debouncer, mut rx) = collecting_debouncer(50);

    debouncer.call(1);
    tokio::time::sleep(Duration::from_millis(40)).await;

    // 在到期前重排，視窗重新起算
    debouncer.call(2);
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(drain(&mut rx).is_empty());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(drain(&mut rx), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_cancel_suppresses_pending_call() {
    let (mut debouncer, mut rx) = collecting_debouncer(50);

    debouncer.call(7);
    assert!(debouncer.is_pending());

    debouncer.cancel();
    assert!(!debouncer.is_pending());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_debounce_flush_invokes_immediately() {
    let (mut debouncer, mut rx) = collecting_debouncer(50);

    debouncer.call(9);
    debouncer.flush();

    assert_eq!(drain(&mut rx), vec![9]);
    assert!(!debouncer.is_pending());

    // flush 過的計時器不會再觸發第二次
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_debounce_flush_without_pending_is_a_no_op() {
    let (mut debouncer, mut rx) = collecting_debouncer(50);

    debouncer.flush();
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_throttle_leading_edge_window() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut throttler = Throttler::new(Duration::from_millis(80), move |arg: u32| {
        let _ = tx.send(arg);
    });
    assert_eq!(throttler.interval(), Duration::from_millis(80));

    // 第一次馬上過，窗口內全部被丟
    assert!(throttler.call(1));
    assert!(!throttler.call(2));
    assert!(!throttler.is_open());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!throttler.call(3));

    // 窗口過期後再度放行
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(throttler.is_open());
    assert!(throttler.call(4));

    assert_eq!(drain(&mut rx), vec![1, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_cancel_reopens_window() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut throttler = Throttler::new(Duration::from_millis(80), move |arg: u32| {
        let _ = tx.send(arg);
    });

    assert!(throttler.call(1));
    assert!(!throttler.call(2));

    throttler.cancel();
    assert!(throttler.is_open());
    assert!(throttler.call(3));

    assert_eq!(drain(&mut rx), vec![1, 3]);
}
