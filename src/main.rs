//! mirrorsync - Periodic one-way mirroring of a directory tree.
//!
//! Usage:
//!   mirrorsync -s SOURCE -r REPLICA -i SECONDS [-l FILE.log]
//!   mirrorsync -s SOURCE -r REPLICA -i SECONDS --once
//!   mirrorsync --help

mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::info;

use mirrorsync_core::{ConfigError, DEFAULT_LOG_FILE, SyncConfig};
use mirrorsync_ops::{Reconciler, Scheduler, TracingReporter, TreeLister};

/// Exit status for invalid configuration.
const CONFIG_ERROR_STATUS: i32 = 2;

#[derive(Parser)]
#[command(
    name = "mirrorsync",
    version,
    about = "Replicate a source folder into a replica folder",
    long_about = "mirrorsync keeps the set of files in a replica folder identical to a \
                  source folder.\n\n\
                  Every interval it copies files missing from the replica and removes \
                  replica files that no longer exist in the source. Files present in \
                  both are not compared."
)]
struct Cli {
    /// Path to source folder
    #[arg(short = 's', long = "source_folder")]
    source_folder: PathBuf,

    /// Path to replica folder
    #[arg(short = 'r', long = "replica_folder")]
    replica_folder: PathBuf,

    /// Backup interval in seconds, should be integer
    #[arg(
        short = 'i',
        long = "backup_interval",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    backup_interval: u64,

    /// Path to log file, should have .log extension
    #[arg(short = 'l', long = "log_file_path", default_value = DEFAULT_LOG_FILE)]
    log_file_path: PathBuf,

    /// Run a single sync cycle and exit
    #[arg(long)]
    once: bool,

    /// Mirror files whose name starts with '.'
    #[arg(long)]
    include_hidden: bool,

    /// Walker threads (1 = serial, 0 = auto-detect)
    #[arg(long, default_value_t = 1)]
    threads: usize,
}

impl Cli {
    fn into_config(self) -> Result<SyncConfig, ConfigError> {
        SyncConfig::builder()
            .source(self.source_folder)
            .replica(self.replica_folder)
            .interval(Duration::from_secs(self.backup_interval))
            .log_file(self.log_file_path)
            .exclude_hidden(!self.include_hidden)
            .threads(self.threads)
            .build()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let once = cli.once;
    let config = match cli.into_config().and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => config,
        Err(e) => {
            for problem in e.problems() {
                eprintln!("{problem}");
            }
            std::process::exit(CONFIG_ERROR_STATUS);
        }
    };

    logging::init(&config.log_file)?;

    let reconciler = Reconciler::new(Arc::new(TracingReporter::new()))
        .with_lister(TreeLister::with_threads(config.threads))
        .with_exclude_hidden(config.exclude_hidden);
    let scheduler = Scheduler::new(reconciler, config.source, config.replica, config.interval);

    if once {
        let report = scheduler.run_once().await?;
        if !report.is_success() {
            bail!("{} actions failed", report.failed());
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_on_interrupt(cancel.clone()));

    let stats = scheduler.run(cancel).await;
    info!(
        cycles = stats.cycles,
        aborted = stats.aborted_cycles,
        applied = stats.actions_applied,
        failed = stats.actions_failed,
        "Shutdown complete"
    );

    Ok(())
}

/// Cancel `token` on Ctrl-C.
async fn shutdown_on_interrupt(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Interrupt received, stopping after the current cycle");
    }
    token.cancel();
}
