//! msg-react: prints the plugin manifest the host would register.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env > config)
//!   4. Init logger
//!   5. Build the plugin table and print each manifest as JSON

use std::sync::Arc;

use tracing::info;

use msg_react::error::AppError;
use msg_react::{config, logger, plugin};

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args()?;
    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        bot = %config.bot.nickname,
        enabled = config.enabled,
        hints = config.react.action_require.len(),
        "config loaded"
    );

    let config = Arc::new(config);
    let manifests: Vec<plugin::Manifest> = plugin::plugins(config)
        .iter()
        .map(|p| plugin::manifest(p.as_ref()))
        .collect();

    let json = serde_json::to_string_pretty(&manifests)
        .map_err(|e| AppError::Plugin(format!("cannot serialise manifest: {e}")))?;
    println!("{json}");

    Ok(())
}

fn parse_cli_args() -> Result<CliArgs, AppError> {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: msg-react [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => {
                    return Err(AppError::Config("-f/--config requires a path argument".into()));
                }
            },
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => {
                return Err(AppError::Config(format!("unknown argument: {other}")));
            }
        }
    }

    Ok(CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
    })
}
