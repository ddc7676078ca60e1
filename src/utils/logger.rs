use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// 互動式輸出：緊湊單行格式，`verbose` 時本 crate 放寬到 debug
pub fn init_cli_logger(verbose: bool) {
    let directives = if verbose {
        "small_kit=debug,info"
    } else {
        "small_kit=info"
    };

    tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 機器可讀輸出：每行一筆 JSON，方便丟給日誌管線
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter("small_kit=info"))
        .with(
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
