use crate::app::scenarios::debounce_burst::DebounceBurstScenario;
use crate::app::scenarios::emitter_fanout::EmitterFanoutScenario;
use crate::app::scenarios::flaky_source::FlakySourceScenario;
use crate::app::scenarios::settlement::SettlementScenario;
use crate::config::scenario::ScenarioConfig;
use crate::domain::model::ScenarioReport;
use crate::domain::ports::{Scenario, SuiteOptions};
use crate::utils::error::{KitError, Result};
use std::collections::HashMap;
use std::time::Instant;

/// 場景套件，負責依序執行多個場景
pub struct ScenarioSuite {
    scenarios: Vec<Box<dyn Scenario>>, // 使用 trait object 支持多態
    execution_id: String,
}

impl ScenarioSuite {
    pub fn new(execution_id: String) -> Self {
        Self {
            scenarios: Vec::new(),
            execution_id,
        }
    }

    /// 添加場景
    pub fn add_scenario(&mut self, scenario: Box<dyn Scenario>) {
        self.scenarios.push(scenario);
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// 已註冊的場景名稱，照添加順序
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name()).collect()
    }

    fn is_selected(options: &dyn SuiteOptions, name: &str) -> bool {
        let only = options.only();
        if !only.is_empty() && !only.iter().any(|n| n == name) {
            return false;
        }
        !options.skip().iter().any(|n| n == name)
    }

    /// 依序執行所有場景
    pub async fn execute_all(&self, options: &dyn SuiteOptions) -> Result<Vec<ScenarioReport>> {
        let mut reports = Vec::new();

        tracing::info!(
            "🚀 Suite {} started ({} scenario(s) registered)",
            self.execution_id,
            self.scenarios.len()
        );

        for scenario in &self.scenarios {
            if !Self::is_selected(options, scenario.name()) {
                tracing::info!("⏭️ Skipping scenario: {} (filtered out)", scenario.name());
                continue;
            }

            if !scenario.enabled() {
                tracing::info!("⏸️ Skipping scenario: {} (disabled)", scenario.name());
                continue;
            }

            let start_time = Instant::now();
            match scenario.run().await {
                Ok(mut report) => {
                    report.duration = start_time.elapsed();
                    tracing::info!(
                        "✅ Scenario finished: {} (duration: {:?})",
                        report.scenario_name,
                        report.duration
                    );
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("❌ Scenario failed: {}: {}", scenario.name(), e);
                    if !options.keep_going() {
                        return Err(KitError::ScenarioError {
                            scenario: scenario.name().to_string(),
                            details: e.to_string(),
                        });
                    }

                    // keep_going 模式：失敗記進報告，繼續跑下一個
                    let mut report = ScenarioReport::new(scenario.name());
                    report.duration = start_time.elapsed();
                    report.insert_detail("error", serde_json::Value::String(e.to_string()));
                    reports.push(report);
                }
            }
        }

        Ok(reports)
    }

    /// 獲取執行摘要
    pub fn execution_summary(&self, reports: &[ScenarioReport]) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_scenarios = reports.len();
        let failed_scenarios = reports
            .iter()
            .filter(|r| r.detail("error").is_some())
            .count();
        let total_duration: std::time::Duration = reports.iter().map(|r| r.duration).sum();

        summary.insert(
            "execution_id".to_string(),
            serde_json::Value::String(self.execution_id.clone()),
        );
        summary.insert(
            "total_scenarios".to_string(),
            serde_json::Value::Number(total_scenarios.into()),
        );
        summary.insert(
            "failed_scenarios".to_string(),
            serde_json::Value::Number(failed_scenarios.into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let scenario_names: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| serde_json::Value::String(r.scenario_name.clone()))
            .collect();
        summary.insert(
            "executed_scenarios".to_string(),
            serde_json::Value::Array(scenario_names),
        );
        summary.insert(
            "generated_at".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );

        summary
    }
}

/// 以配置組出內建的四個場景
pub fn default_suite(execution_id: String, config: &ScenarioConfig) -> ScenarioSuite {
    let mut suite = ScenarioSuite::new(execution_id);
    suite.add_scenario(Box::new(DebounceBurstScenario::new(config)));
    suite.add_scenario(Box::new(FlakySourceScenario::new(config)));
    suite.add_scenario(Box::new(EmitterFanoutScenario::new(config)));
    suite.add_scenario(Box::new(SettlementScenario::new(config)));
    suite
}

/// 將執行摘要與各場景報告合併匯出成 JSON 檔
pub async fn export_run_summary(
    summary: &HashMap<String, serde_json::Value>,
    reports: &[ScenarioReport],
    path: &str,
) -> Result<()> {
    let mut export = HashMap::new();
    export.insert(
        "summary".to_string(),
        serde_json::Value::Object(summary.clone().into_iter().collect()),
    );

    let report_entries: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            let mut entry = HashMap::new();
            entry.insert(
                "name".to_string(),
                serde_json::Value::String(report.scenario_name.clone()),
            );
            entry.insert(
                "duration_ms".to_string(),
                serde_json::Value::Number((report.duration.as_millis() as u64).into()),
            );

            // 場景細節攤平進同一層，匯出的報告一眼就能比對
            for (key, value) in &report.details {
                entry.insert(key.clone(), value.clone());
            }

            serde_json::Value::Object(entry.into_iter().collect())
        })
        .collect();
    export.insert(
        "scenarios".to_string(),
        serde_json::Value::Array(report_entries),
    );

    let export_json = serde_json::to_string_pretty(&export)?;
    tokio::fs::write(path, export_json).await?;

    tracing::info!("💾 Run summary exported to: {}", path);
    Ok(())
}
