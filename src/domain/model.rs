use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// 單一 future 的結算結果（fulfilled 或 rejected）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T, E> {
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> Settled<T, E> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Settled::Rejected(_))
    }

    pub fn fulfilled(self) -> Option<T> {
        match self {
            Settled::Fulfilled(value) => Some(value),
            Settled::Rejected(_) => None,
        }
    }

    pub fn rejected(self) -> Option<E> {
        match self {
            Settled::Fulfilled(_) => None,
            Settled::Rejected(error) => Some(error),
        }
    }
}

/// 所有 future 都失敗時的聚合錯誤，錯誤依輸入順序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError<E> {
    pub errors: Vec<E>,
}

impl<E> AggregateError<E> {
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    pub fn empty() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no futures to race");
        }
        write!(
            f,
            "all {} futures rejected; first: {}",
            self.errors.len(),
            self.errors[0]
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for AggregateError<E> {}

/// Scenario 執行結果
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub duration: std::time::Duration,
    pub details: HashMap<String, serde_json::Value>,
}

impl ScenarioReport {
    pub fn new(scenario_name: impl Into<String>) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            duration: std::time::Duration::ZERO,
            details: HashMap::new(),
        }
    }

    /// 添加結果明細
    pub fn insert_detail(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.details.insert(key.into(), value);
    }

    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.get(key)
    }
}
