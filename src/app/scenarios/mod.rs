pub mod debounce_burst;
pub mod emitter_fanout;
pub mod flaky_source;
pub mod settlement;
pub mod suite;

pub use suite::{default_suite, export_run_summary, ScenarioSuite};
