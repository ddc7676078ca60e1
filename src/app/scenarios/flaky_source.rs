use crate::config::scenario::ScenarioConfig;
use crate::core::combinators::with_timeout;
use crate::core::retry::{retry_with_policy, RetryPolicy};
use crate::domain::model::ScenarioReport;
use crate::domain::ports::Scenario;
use crate::utils::error::{KitError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// 不穩定資料源場景：資料源前幾次請求必定失敗，
/// 以重試策略包住直到成功，整段再罩一層逾時
pub struct FlakySourceScenario {
    policy: RetryPolicy,
    fail_first: u32,
    latency: Duration,
    timeout: Duration,
}

impl FlakySourceScenario {
    pub fn new(config: &ScenarioConfig) -> Self {
        Self {
            policy: config.retry_policy(),
            fail_first: config.fail_first(),
            latency: config.source_latency(),
            timeout: config.source_timeout(),
        }
    }

    /// 模擬一次對不穩定資料源的請求
    async fn fetch(&self, attempt: u32) -> std::result::Result<serde_json::Value, String> {
        tokio::time::sleep(self.latency).await;

        if attempt <= self.fail_first {
            return Err(format!("source unavailable (attempt {})", attempt));
        }

        Ok(serde_json::json!({
            "attempt": attempt,
            "items": [1, 2, 3],
        }))
    }
}

#[async_trait]
impl Scenario for FlakySourceScenario {
    fn name(&self) -> &str {
        "flaky-source"
    }

    async fn run(&self) -> Result<ScenarioReport> {
        let attempts = AtomicU32::new(0);

        tracing::info!(
            "📡 fetching from a source that fails the first {} attempt(s)",
            self.fail_first
        );

        let outcome = with_timeout(
            self.timeout,
            retry_with_policy(&self.policy, |attempt| {
                attempts.store(attempt, Ordering::SeqCst);
                self.fetch(attempt)
            }),
        )
        .await?;

        let payload = outcome.map_err(|e| KitError::ScenarioError {
            scenario: self.name().to_string(),
            details: format!("source kept failing: {}", e),
        })?;

        let made = attempts.load(Ordering::SeqCst);
        tracing::info!("✅ source answered after {} attempt(s)", made);

        let mut report = ScenarioReport::new(self.name());
        report.insert_detail("attempts", serde_json::json!(made));
        report.insert_detail("fail_first", serde_json::json!(self.fail_first));
        report.insert_detail("payload", payload);
        Ok(report)
    }
}
