use crate::core::retry::RetryPolicy;
use crate::domain::ports::SuiteOptions;
use crate::utils::error::{KitError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub suite: SuiteInfo,
    pub timing: Option<TimingConfig>,
    pub retry: Option<RetryPolicy>,
    pub source: Option<SourceConfig>,
    pub combinators: Option<CombinatorConfig>,
    pub events: Option<Vec<EventSpec>>,
    pub execution: Option<ExecutionConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub debounce_delay_ms: Option<u64>,
    pub throttle_interval_ms: Option<u64>,
    pub burst_calls: Option<usize>,
    pub call_gap_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub fail_first: Option<u32>,
    pub latency_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinatorConfig {
    pub timeout_ms: Option<u64>,
    pub concurrency_limit: Option<usize>,
    pub task_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSpec {
    pub name: String,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub keep_going: Option<bool>,
    pub only: Option<Vec<String>>,
    pub skip: Option<Vec<String>>,
}

impl ScenarioConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(KitError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| KitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUITE_NAME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("suite.name", &self.suite.name)?;

        if let Some(timing) = &self.timing {
            if let Some(delay) = timing.debounce_delay_ms {
                crate::utils::validation::validate_range(
                    "timing.debounce_delay_ms",
                    delay,
                    1,
                    60_000,
                )?;
            }
            if let Some(interval) = timing.throttle_interval_ms {
                crate::utils::validation::validate_range(
                    "timing.throttle_interval_ms",
                    interval,
                    1,
                    60_000,
                )?;
            }
            if let Some(burst) = timing.burst_calls {
                crate::utils::validation::validate_positive_number(
                    "timing.burst_calls",
                    burst,
                    1,
                )?;
            }
        }

        if let Some(retry) = &self.retry {
            retry.validate()?;
        }

        if let Some(source) = &self.source {
            if let Some(latency) = source.latency_ms {
                crate::utils::validation::validate_range("source.latency_ms", latency, 0, 60_000)?;
            }
            if let Some(timeout) = source.timeout_ms {
                crate::utils::validation::validate_range(
                    "source.timeout_ms",
                    timeout,
                    1,
                    600_000,
                )?;
            }
        }

        if let Some(combinators) = &self.combinators {
            if let Some(timeout) = combinators.timeout_ms {
                crate::utils::validation::validate_range(
                    "combinators.timeout_ms",
                    timeout,
                    1,
                    600_000,
                )?;
            }
            if let Some(limit) = combinators.concurrency_limit {
                crate::utils::validation::validate_positive_number(
                    "combinators.concurrency_limit",
                    limit,
                    1,
                )?;
            }
            if let Some(count) = combinators.task_count {
                crate::utils::validation::validate_positive_number(
                    "combinators.task_count",
                    count,
                    1,
                )?;
            }
        }

        if let Some(events) = &self.events {
            for (index, spec) in events.iter().enumerate() {
                crate::utils::validation::validate_non_empty_string(
                    &format!("events[{}].name", index),
                    &spec.name,
                )?;
            }
        }

        Ok(())
    }

    /// 取得 debounce 等待時間
    pub fn debounce_delay(&self) -> Duration {
        let ms = self
            .timing
            .as_ref()
            .and_then(|t| t.debounce_delay_ms)
            .unwrap_or(50);
        Duration::from_millis(ms)
    }

    /// 取得 throttle 視窗長度
    pub fn throttle_interval(&self) -> Duration {
        let ms = self
            .timing
            .as_ref()
            .and_then(|t| t.throttle_interval_ms)
            .unwrap_or(80);
        Duration::from_millis(ms)
    }

    /// 連發次數 (模擬密集呼叫)
    pub fn burst_calls(&self) -> usize {
        self.timing.as_ref().and_then(|t| t.burst_calls).unwrap_or(6)
    }

    /// 連發呼叫彼此的間隔
    pub fn call_gap(&self) -> Duration {
        let ms = self
            .timing
            .as_ref()
            .and_then(|t| t.call_gap_ms)
            .unwrap_or(10);
        Duration::from_millis(ms)
    }

    /// 取得重試策略，未設定時用較短的示範延遲
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_else(|| {
            RetryPolicy::default()
                .with_initial_delay_ms(10)
                .with_max_delay_ms(100)
        })
    }

    /// 模擬資料源先失敗幾次
    pub fn fail_first(&self) -> u32 {
        self.source.as_ref().and_then(|s| s.fail_first).unwrap_or(2)
    }

    /// 模擬資料源的單次延遲
    pub fn source_latency(&self) -> Duration {
        let ms = self.source.as_ref().and_then(|s| s.latency_ms).unwrap_or(5);
        Duration::from_millis(ms)
    }

    /// 模擬資料源的逾時上限
    pub fn source_timeout(&self) -> Duration {
        let ms = self
            .source
            .as_ref()
            .and_then(|s| s.timeout_ms)
            .unwrap_or(1000);
        Duration::from_millis(ms)
    }

    /// 組合器場景的逾時上限
    pub fn combinator_timeout(&self) -> Duration {
        let ms = self
            .combinators
            .as_ref()
            .and_then(|c| c.timeout_ms)
            .unwrap_or(500);
        Duration::from_millis(ms)
    }

    /// 併發上限
    pub fn concurrency_limit(&self) -> usize {
        self.combinators
            .as_ref()
            .and_then(|c| c.concurrency_limit)
            .unwrap_or(3)
    }

    /// 併發場景的任務數
    pub fn task_count(&self) -> usize {
        self.combinators
            .as_ref()
            .and_then(|c| c.task_count)
            .unwrap_or(9)
    }

    /// 要廣播的事件清單，未設定時回傳空集合
    pub fn event_specs(&self) -> &[EventSpec] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// 套件層級的環境變數預設值
    pub fn environment_defaults(&self) -> Option<&HashMap<String, String>> {
        self.environment.as_ref()
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            suite: SuiteInfo {
                name: "small-kit-workbench".to_string(),
                description: "Built-in demo suite".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            timing: None,
            retry: None,
            source: None,
            combinators: None,
            events: None,
            execution: None,
            environment: None,
        }
    }
}

impl SuiteOptions for ScenarioConfig {
    fn only(&self) -> &[String] {
        self.execution
            .as_ref()
            .and_then(|e| e.only.as_deref())
            .unwrap_or(&[])
    }

    fn skip(&self) -> &[String] {
        self.execution
            .as_ref()
            .and_then(|e| e.skip.as_deref())
            .unwrap_or(&[])
    }

    fn keep_going(&self) -> bool {
        self.execution
            .as_ref()
            .and_then(|e| e.keep_going)
            .unwrap_or(false)
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
