use crate::config::scenario::ScenarioConfig;
use crate::core::combinators::{all_settled, map_concurrent, race_any, with_timeout};
use crate::domain::model::ScenarioReport;
use crate::domain::ports::Scenario;
use crate::utils::error::{KitError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 組合器場景：一批成敗混雜的任務走 all_settled 清算，
/// 幾條快慢不一的賽道走 race_any 搶第一，
/// 再用 map_concurrent 以固定併發上限跑完整批
pub struct SettlementScenario {
    task_count: usize,
    concurrency_limit: usize,
    timeout: Duration,
}

impl SettlementScenario {
    pub fn new(config: &ScenarioConfig) -> Self {
        Self {
            task_count: config.task_count(),
            concurrency_limit: config.concurrency_limit(),
            timeout: config.combinator_timeout(),
        }
    }
}

#[async_trait]
impl Scenario for SettlementScenario {
    fn name(&self) -> &str {
        "settlement"
    }

    async fn run(&self) -> Result<ScenarioReport> {
        tracing::info!(
            "🔄 settling {} task(s), every third one rejects",
            self.task_count
        );

        let tasks: Vec<_> = (0..self.task_count)
            .map(|index| async move {
                tokio::time::sleep(Duration::from_millis((index % 3) as u64)).await;
                if index % 3 == 2 {
                    Err(format!("task {} rejected", index))
                } else {
                    Ok(index * 10)
                }
            })
            .collect();

        let settled = with_timeout(self.timeout, all_settled(tasks)).await?;
        let fulfilled = settled.iter().filter(|s| s.is_fulfilled()).count();
        let rejected = settled.len() - fulfilled;

        // 最快的賽道先退賽，第一個成功者（lane 1）勝出，其餘被丟棄
        let racers: Vec<_> = (0..3u64)
            .map(|lane| async move {
                tokio::time::sleep(Duration::from_millis(5 * (lane + 1))).await;
                if lane == 0 {
                    Err(format!("lane {} scratched", lane))
                } else {
                    Ok(lane)
                }
            })
            .collect();

        let winner = with_timeout(self.timeout, race_any(racers))
            .await?
            .map_err(|e| KitError::ScenarioError {
                scenario: self.name().to_string(),
                details: format!("no lane finished: {}", e),
            })?;

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mapped = map_concurrent(self.concurrency_limit, 0..self.task_count, |index| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            async move {
                let in_flight = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(in_flight, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok::<usize, String>(index * index)
            }
        })
        .await
        .map_err(|e| KitError::ScenarioError {
            scenario: self.name().to_string(),
            details: format!("mapping failed: {}", e),
        })?;

        let peak_seen = peak.load(Ordering::SeqCst);
        tracing::info!(
            "📊 settled {}/{} fulfilled, lane {} won, peak concurrency {}/{}",
            fulfilled,
            settled.len(),
            winner,
            peak_seen,
            self.concurrency_limit
        );

        let mut report = ScenarioReport::new(self.name());
        report.insert_detail("tasks", serde_json::json!(self.task_count));
        report.insert_detail("fulfilled", serde_json::json!(fulfilled));
        report.insert_detail("rejected", serde_json::json!(rejected));
        report.insert_detail("race_winner", serde_json::json!(winner));
        report.insert_detail("mapped_count", serde_json::json!(mapped.len()));
        report.insert_detail("peak_concurrency", serde_json::json!(peak_seen));
        report.insert_detail(
            "concurrency_limit",
            serde_json::json!(self.concurrency_limit),
        );
        Ok(report)
    }
}
