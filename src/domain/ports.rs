use crate::domain::model::ScenarioReport;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    fn enabled(&self) -> bool {
        true
    }

    async fn run(&self) -> Result<ScenarioReport>;
}

pub trait SuiteOptions: Send + Sync {
    fn only(&self) -> &[String];
    fn skip(&self) -> &[String];
    fn keep_going(&self) -> bool;
}
