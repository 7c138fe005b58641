//! spamcheck: console entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Build the classifier and start a session
//!   7. Spawn Ctrl-C → shutdown watcher
//!   8. Run the console until shutdown, EOF, or `/quit`

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use spamcheck::classifier::providers;
use spamcheck::error::AppError;
use spamcheck::session::{SessionHistory, SessionManager, SessionSettings};
use spamcheck::{config, console, logger};

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        app_name = %config.app_name,
        classifier = %config.classifier.backend,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let classifier = providers::build(&config.classifier)
        .map_err(|e| AppError::Config(format!("[classifier]: {e}")))?;

    let manager = Arc::new(SessionManager::new(
        classifier,
        SessionHistory::new(),
        SessionSettings::from(&config.session),
    ));

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            ctrlc_token.cancel();
        }
    });

    console::run(manager, config.session.history_limit, shutdown).await
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: spamcheck [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -v, -vv, -vvv, -vvvv       Set logging verbosity (warn, info, debug, trace)");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a => {
                if let Some(n) = logger::verbosity_flag(a) {
                    verbosity = verbosity.saturating_add(n);
                }
            }
        }
    }

    CliArgs { log_level: logger::level_for_verbosity(verbosity), config_path }
}
