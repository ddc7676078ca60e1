use crate::config::scenario::ScenarioConfig;
use crate::core::debounce::Debouncer;
use crate::core::throttle::Throttler;
use crate::domain::model::ScenarioReport;
use crate::domain::ports::Scenario;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 連發呼叫場景：同一批密集呼叫分別餵給 debouncer 與 throttler，
/// 觀察兩者各自把連發壓縮成幾次實際執行
pub struct DebounceBurstScenario {
    delay: Duration,
    interval: Duration,
    burst_calls: usize,
    call_gap: Duration,
}

impl DebounceBurstScenario {
    pub fn new(config: &ScenarioConfig) -> Self {
        Self {
            delay: config.debounce_delay(),
            interval: config.throttle_interval(),
            burst_calls: config.burst_calls(),
            call_gap: config.call_gap(),
        }
    }
}

#[async_trait]
impl Scenario for DebounceBurstScenario {
    fn name(&self) -> &str {
        "debounce-burst"
    }

    async fn run(&self) -> Result<ScenarioReport> {
        let debounced_runs = Arc::new(AtomicU32::new(0));
        let debounce_counter = Arc::clone(&debounced_runs);
        let mut debouncer = Debouncer::new(self.delay, move |_call: usize| {
            debounce_counter.fetch_add(1, Ordering::SeqCst);
        });

        let throttled_runs = Arc::new(AtomicU32::new(0));
        let throttle_counter = Arc::clone(&throttled_runs);
        let mut throttler = Throttler::new(self.interval, move |_call: usize| {
            throttle_counter.fetch_add(1, Ordering::SeqCst);
        });

        tracing::info!(
            "🎬 firing {} calls {}ms apart (debounce {}ms, throttle {}ms)",
            self.burst_calls,
            self.call_gap.as_millis(),
            self.delay.as_millis(),
            self.interval.as_millis()
        );

        let mut throttle_passed = 0usize;
        for call in 0..self.burst_calls {
            debouncer.call(call);
            if throttler.call(call) {
                throttle_passed += 1;
            }
            tokio::time::sleep(self.call_gap).await;
        }

        // 等最後一個 debounce 計時器到期
        tokio::time::sleep(self.delay * 2).await;
        let debounced = debounced_runs.load(Ordering::SeqCst);

        tracing::info!(
            "📊 burst of {}: debounce ran {} time(s), throttle let {} through",
            self.burst_calls,
            debounced,
            throttle_passed
        );

        let mut report = ScenarioReport::new(self.name());
        report.insert_detail("burst_calls", serde_json::json!(self.burst_calls));
        report.insert_detail("debounced_runs", serde_json::json!(debounced));
        report.insert_detail("throttle_passed", serde_json::json!(throttle_passed));
        report.insert_detail(
            "throttled_runs",
            serde_json::json!(throttled_runs.load(Ordering::SeqCst)),
        );
        Ok(report)
    }
}
