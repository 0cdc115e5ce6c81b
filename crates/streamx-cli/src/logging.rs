use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use streamx_config::LoggingConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub fn init_logging(verbose_level: u8, quiet: bool, logging: &LoggingConfig) -> Result<()> {
    // 0 = configured level, 1 = debug (hyper::proto::h1 suppressed), 2+ = trace
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose_level > 0 {
        let filter_str = match verbose_level {
            1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str))
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(logging.level.to_lowercase()))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let json = json_output(std::env::var("RUST_LOG_JSON").ok().as_deref(), logging.json, || {
        io::stdout().is_terminal()
    });

    let registry = Registry::default().with(filter);

    if let Some(log_path) = &logging.file {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // streamx.log rotates into streamx.2026-01-17 and so on
        let log_dir = log_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
        let log_filename = log_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
        let log_prefix = log_filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(log_filename);

        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

        if json {
            let json_layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);

            registry.with(json_layer).init();
        } else {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);

            registry.with(fmt_layer).init();
        }
    } else if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);

        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);

        registry.with(fmt_layer).init();
    }

    Ok(())
}

/// `RUST_LOG_JSON` wins over the config file; with neither set, JSON is used
/// when stdout is not a terminal.
fn json_output(env: Option<&str>, configured: Option<bool>, is_terminal: impl FnOnce() -> bool) -> bool {
    match (env, configured) {
        (Some(value), _) => value == "true",
        (None, Some(json)) => json,
        (None, None) => !is_terminal(),
    }
}
