pub mod collections;
pub mod combinators;
pub mod debounce;
pub mod emitter;
pub mod functional;
pub mod json;
pub mod retry;
pub mod throttle;

pub use crate::domain::model::{AggregateError, Settled};
pub use crate::domain::ports::Scenario;
pub use crate::utils::error::Result;
