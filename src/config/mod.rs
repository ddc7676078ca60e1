pub mod scenario;

use crate::domain::ports::SuiteOptions;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "small-kit")]
#[command(about = "A workbench for running small utility scenarios")]
pub struct CliConfig {
    #[arg(long, help = "Path to a scenario TOML file")]
    pub config: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Run only these scenarios")]
    pub only: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Skip these scenarios")]
    pub skip: Vec<String>,

    #[arg(long, help = "Keep running after a scenario fails")]
    pub keep_going: bool,

    #[arg(long, help = "Write the run summary JSON to this path")]
    pub summary_file: Option<String>,

    #[arg(long, help = "Override the generated execution id")]
    pub execution_id: Option<String>,

    #[arg(long, help = "List available scenarios and exit")]
    pub list: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl SuiteOptions for CliConfig {
    fn only(&self) -> &[String] {
        &self.only
    }

    fn skip(&self) -> &[String] {
        &self.skip
    }

    fn keep_going(&self) -> bool {
        self.keep_going
    }
}

/// 檔案配置與指令列合併後的執行選項；指令列的清單非空時優先
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub only: Vec<String>,
    pub skip: Vec<String>,
    pub keep_going: bool,
}

impl RunOptions {
    #[cfg(feature = "cli")]
    pub fn merged(cli: &CliConfig, file: &scenario::ScenarioConfig) -> Self {
        let only = if cli.only.is_empty() {
            file.only().to_vec()
        } else {
            cli.only.clone()
        };
        let skip = if cli.skip.is_empty() {
            file.skip().to_vec()
        } else {
            cli.skip.clone()
        };

        Self {
            only,
            skip,
            keep_going: cli.keep_going || file.keep_going(),
        }
    }
}

impl SuiteOptions for RunOptions {
    fn only(&self) -> &[String] {
        &self.only
    }

    fn skip(&self) -> &[String] {
        &self.skip
    }

    fn keep_going(&self) -> bool {
        self.keep_going
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::scenario::ScenarioConfig;
    use super::*;

    fn cli_with(only: Vec<String>, skip: Vec<String>, keep_going: bool) -> CliConfig {
        CliConfig {
            config: None,
            only,
            skip,
            keep_going,
            summary_file: None,
            execution_id: None,
            list: false,
            json_logs: false,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_lists_override_file_lists() {
        let file = ScenarioConfig::from_toml_str(
            r#"
[suite]
name = "demo"
description = "d"
version = "1.0"

[execution]
only = ["from-file"]
skip = ["file-skip"]
"#,
        )
        .unwrap();

        let cli = cli_with(vec!["from-cli".to_string()], Vec::new(), false);
        let merged = RunOptions::merged(&cli, &file);

        assert_eq!(merged.only(), ["from-cli".to_string()]);
        assert_eq!(merged.skip(), ["file-skip".to_string()]);
    }

    #[test]
    fn test_keep_going_is_or_of_both_sources() {
        let file = ScenarioConfig::from_toml_str(
            r#"
[suite]
name = "demo"
description = "d"
version = "1.0"

[execution]
keep_going = true
"#,
        )
        .unwrap();

        let cli = cli_with(Vec::new(), Vec::new(), false);
        assert!(RunOptions::merged(&cli, &file).keep_going());

        let plain = ScenarioConfig::default();
        let insistent = cli_with(Vec::new(), Vec::new(), true);
        assert!(RunOptions::merged(&insistent, &plain).keep_going());
        assert!(!RunOptions::merged(&cli, &plain).keep_going());
    }
}
