pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::scenarios::{default_suite, ScenarioSuite};
pub use config::scenario::ScenarioConfig;
pub use config::RunOptions;
pub use core::debounce::Debouncer;
pub use core::emitter::EventEmitter;
pub use core::retry::{retry_with_policy, RetryPolicy};
pub use core::throttle::Throttler;
pub use domain::model::{AggregateError, ScenarioReport, Settled};
pub use utils::error::{KitError, Result};
