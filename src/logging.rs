//! Log subscriber setup.
//!
//! Replica lines (`<timestamp> <destination> <ACTION>`) go to both the log
//! file and stdout, with no level or target prefix. Every other event keeps
//! its level: the file receives warnings and errors from every target, and
//! stdout follows `MIRRORSYNC_LOG` (default `info`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Context, Result};
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::{Directive, LevelFilter, Targets};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::{Filter, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use mirrorsync_ops::REPLICA_LOG_TARGET;

/// Timestamp format of every log line.
const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Environment variable overriding the console filter.
const LOG_ENV: &str = "MIRRORSYNC_LOG";

/// Install the global subscriber writing to `log_file` and stdout.
pub fn init(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    let diagnostic_file = file
        .try_clone()
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(replica_layer(Mutex::new(file)))
        .with(diagnostic_layer(Mutex::new(diagnostic_file), file_filter(), false))
        .with(replica_layer(std::io::stdout))
        .with(diagnostic_layer(std::io::stdout, console_filter()?, true))
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

/// Renders replica events as `<timestamp> <destination> <ACTION>`.
fn replica_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(Targets::new().with_target(REPLICA_LOG_TARGET, Level::INFO))
}

/// Renders every other event with its level.
fn diagnostic_layer<S, W, F>(writer: W, filter: F, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    F: Filter<S> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .with_filter(filter)
}

fn file_filter() -> Targets {
    Targets::new()
        .with_target(REPLICA_LOG_TARGET, LevelFilter::OFF)
        .with_default(Level::WARN)
}

fn console_filter() -> Result<EnvFilter> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let replica_off = format!("{REPLICA_LOG_TARGET}=off")
        .parse::<Directive>()
        .context("Invalid replica log directive")?;
    Ok(filter.add_directive(replica_off))
}
