use crate::utils::error::{KitError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::time::Duration;

/// 重試策略：指數退避、上限封頂
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            backoff_factor: 2.0,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// 固定間隔重試（無退避）
    pub fn fixed(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: delay_ms,
            backoff_factor: 1.0,
            max_delay_ms: delay_ms,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay_ms(mut self, initial_delay_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self
    }

    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// 第 `attempt` 次（1 起算）失敗後的等待時間
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let scaled = self.initial_delay_ms as f64 * self.backoff_factor.powi(exponent);
        let capped = scaled.min(self.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }
}

impl Validate for RetryPolicy {
    fn validate(&self) -> Result<()> {
        validate_positive_number("retry.max_attempts", self.max_attempts as usize, 1)?;
        validate_range("retry.backoff_factor", self.backoff_factor, 1.0, 64.0)?;

        if self.max_delay_ms < self.initial_delay_ms {
            return Err(KitError::InvalidConfigValueError {
                field: "retry.max_delay_ms".to_string(),
                value: self.max_delay_ms.to_string(),
                reason: format!(
                    "Cap must not be below initial delay ({}ms)",
                    self.initial_delay_ms
                ),
            });
        }

        Ok(())
    }
}

/// 依策略重試非同步操作：`op` 接收 1 起算的嘗試編號。
/// 回傳第一次成功的結果；嘗試用盡時回傳最後一個錯誤。
pub async fn retry_with_policy<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> std::result::Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!("🔁 succeeded on attempt {}/{}", attempt, attempts);
                }
                return Ok(value);
            }
            Err(error) => {
                tracing::warn!("⚠️ attempt {}/{} failed: {}", attempt, attempts, error);
                if attempt >= attempts {
                    return Err(error);
                }
                tokio::time::sleep(policy.delay_for(attempt)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_exponentially_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay_ms: 100,
            backoff_factor: 2.0,
            max_delay_ms: 350,
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(4), Duration::from_millis(350));
    }

    #[test]
    fn test_fixed_policy_never_backs_off() {
        let policy = RetryPolicy::fixed(4, 50);
        assert_eq!(policy.delay_for(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for(3), Duration::from_millis(50));
    }

    #[test]
    fn test_builder_methods() {
        let policy = RetryPolicy::default()
            .with_max_attempts(7)
            .with_initial_delay_ms(10)
            .with_backoff_factor(3.0)
            .with_max_delay_ms(90);

        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.initial_delay_ms, 10);
        assert_eq!(policy.backoff_factor, 3.0);
        assert_eq!(policy.max_delay_ms, 90);
    }

    #[test]
    fn test_policy_validation() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert!(RetryPolicy::default()
            .with_max_attempts(0)
            .validate()
            .is_err());
        assert!(RetryPolicy::default()
            .with_backoff_factor(0.5)
            .validate()
            .is_err());
        assert!(RetryPolicy::default()
            .with_initial_delay_ms(500)
            .with_max_delay_ms(100)
            .validate()
            .is_err());
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"max_attempts": 6}"#).unwrap();
        assert_eq!(policy.max_attempts, 6);
        assert_eq!(policy.initial_delay_ms, 100);
        assert_eq!(policy.backoff_factor, 2.0);
    }
}
