//! Entry point: config discovery, logging bootstrap, command dispatch.

mod cli;
mod commands;
mod error_fmt;

use clap::Parser;
use cli::{Cli, Commands, DEFAULT_CONFIG_PATH, FILE_GUARD, JSON_MODE};
use eyre::WrapErr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("Error: {}", error_fmt::humanize(&err));
        }
        std::process::exit(error_fmt::exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;
    let cfg = load_config(&cli)?;
    init_logging(&cli, &cfg.logging)?;
    cfg.validate()?;

    match cli.cmd {
        Commands::Run {
            refresh_secs,
            iterations,
            dry_run,
        } => commands::run(&cfg, refresh_secs, iterations, dry_run, cli.json),
        Commands::Fetch { limit } => commands::fetch(&cfg, limit, cli.json),
        Commands::Valve { state, dry_run } => commands::valve(&cfg, state, dry_run),
        Commands::SendParams {
            interval,
            tariff,
            dry_run,
        } => commands::send_params(&cfg, interval, tariff, dry_run),
        Commands::SelfCheck => commands::self_check(&cfg),
    }
}

/// Explicit --config must exist; the default path is probed and silently
/// skipped in favor of built-in defaults.
fn load_config(cli: &Cli) -> eyre::Result<flowgate_config::Config> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => {
            let default = std::path::PathBuf::from(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok(flowgate_config::Config::default());
            }
            default
        }
    };
    let content = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("read config file {}", path.display()))?;
    let cfg = flowgate_config::load_toml(&content)
        .wrap_err_with(|| format!("parse config file {}", path.display()))?;
    Ok(cfg)
}

fn init_logging(cli: &Cli, log_cfg: &flowgate_config::Logging) -> eyre::Result<()> {
    // CLI flag wins when set away from its default; otherwise the config's
    // logging.level applies.
    let level = if cli.log_level != "info" {
        cli.log_level.clone()
    } else {
        log_cfg.level.clone().unwrap_or_else(|| "info".to_string())
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let file_layer = match &log_cfg.file {
        Some(file) => {
            let path = std::path::Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .map(std::ffi::OsStr::to_os_string)
                .unwrap_or_else(|| std::ffi::OsString::from("flowgate.log"));
            let appender = match log_cfg.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    // Logs go to stderr so stdout stays parseable command output.
    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let init_result = if cli.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    init_result.map_err(|e| eyre::eyre!("init logging: {e}"))
}
