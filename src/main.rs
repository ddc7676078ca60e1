use anyhow::Context;
use clap::Parser;
use small_kit::app::scenarios::{default_suite, export_run_summary, ScenarioSuite};
use small_kit::domain::model::ScenarioReport;
use small_kit::utils::{logger, validation, validation::Validate};
use small_kit::{CliConfig, RunOptions, ScenarioConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting small-kit workbench");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入場景配置，沒給路徑就用內建預設
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading scenario configuration from: {}", path);
            match ScenarioConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load scenario config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => ScenarioConfig::default(),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Scenario configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Scenario configuration loaded and validated successfully");

    if let Some(path) = &cli.summary_file {
        if let Err(e) = validation::validate_path("summary_file", path) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    // 套件層級的環境變數預設值，只補進程裡沒設的
    if let Some(defaults) = config.environment_defaults() {
        for (key, value) in defaults {
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }

    // 生成執行 ID
    let execution_id = cli
        .execution_id
        .clone()
        .unwrap_or_else(|| format!("kit_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));

    let suite = default_suite(execution_id.clone(), &config);

    display_suite_summary(&config, &cli, &suite, &execution_id);

    if cli.list {
        return Ok(());
    }

    let options = RunOptions::merged(&cli, &config);

    tracing::info!("🎬 Starting scenario suite execution");
    match suite.execute_all(&options).await {
        Ok(reports) => {
            tracing::info!("🎉 Scenario suite completed!");

            display_run_reports(&reports, &execution_id);

            let summary = suite.execution_summary(&reports);
            let summary_json =
                serde_json::to_string_pretty(&summary).context("failed to encode run summary")?;
            println!("{}", summary_json);

            if let Some(path) = &cli.summary_file {
                export_run_summary(&summary, &reports, path)
                    .await
                    .with_context(|| format!("failed to write summary to {}", path))?;
                println!("💾 Summary saved to: {}", path);
            }

            let failed = summary
                .get("failed_scenarios")
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            if failed > 0 {
                tracing::warn!("⚠️ {} scenario(s) failed (keep-going mode)", failed);
                std::process::exit(1);
            }

            println!("✅ Scenario suite completed successfully!");
            println!("🆔 Execution ID: {}", execution_id);
            println!("📊 Scenarios executed: {}", reports.len());
        }
        Err(e) => {
            tracing::error!("❌ Scenario suite failed: {}", e);
            eprintln!("❌ Scenario suite failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_suite_summary(
    config: &ScenarioConfig,
    cli: &CliConfig,
    suite: &ScenarioSuite,
    execution_id: &str,
) {
    println!("📋 Scenario Suite Summary:");
    println!("  Name: {} v{}", config.suite.name, config.suite.version);
    println!("  Description: {}", config.suite.description);
    println!("  Execution ID: {}", execution_id);

    if !cli.only.is_empty() {
        println!("  🎯 Only executing: {}", cli.only.join(", "));
    }

    if !cli.skip.is_empty() {
        println!("  ⏭️ Skipping: {}", cli.skip.join(", "));
    }

    println!();
    println!("📝 Registered Scenarios:");
    for (index, name) in suite.scenario_names().iter().enumerate() {
        println!("  {}. {}", index + 1, name);
    }
    println!();
}

fn display_run_reports(reports: &[ScenarioReport], execution_id: &str) {
    println!();
    println!("📊 Execution Results Summary:");
    println!("  Execution ID: {}", execution_id);
    println!("  Completed Scenarios: {}", reports.len());

    let total_duration: std::time::Duration = reports.iter().map(|r| r.duration).sum();
    println!("  Total Execution Time: {:?}", total_duration);
    println!();

    println!("📝 Scenario Details:");
    for (index, report) in reports.iter().enumerate() {
        let status = if report.detail("error").is_some() {
            "❌"
        } else {
            "✅"
        };
        println!(
            "  {}. {} {} - {:?}",
            index + 1,
            status,
            report.scenario_name,
            report.duration
        );
    }
    println!();
}
