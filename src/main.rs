use clap::Parser;
use jdkauto::app_constants::log as log_consts;
use jdkauto::cli::{Cli, CommandHandler};
use jdkauto::{AppError, CancelToken, Config};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化日志
///
/// `--debug` 优先，其次 `RUST_LOG`，默认 info。
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(log_consts::DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_consts::DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// 输出带建议的错误并退出；取消时退出码为 130
fn fail(error: AppError, operation: &str) -> ! {
    let code = if error.is_cancelled() { 130 } else { 1 };
    let suggestions = error.suggestions();
    eprint!("{}", error.with_context(operation).with_suggestions(suggestions).user_message());
    process::exit(code);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    tracing::debug!("jdkauto starting with args: {:?}", cli);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => fail(e, "加载配置"),
    };

    // Ctrl-C 只发出取消信号，由正在运行的操作自行收尾
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let operation = cli.command.operation();
    let mut handler = CommandHandler::new(config, cancel);
    if let Err(e) = handler.handle_command(cli.command).await {
        fail(e, &operation);
    }
}
