//! Logging setup.
//!
//! Library code logs through the `log` macros. `tracing-subscriber` collects
//! them (its `tracing-log` bridge is on by default) and writes JSON lines to a
//! daily rolling file under `<data_dir>/logs`. The stdout layer is only
//! installed for headless commands; the panel owns the terminal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "speakpanel.log";
const DEFAULT_FILTER: &str = "info";

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

fn prepare_log_dir(data_dir: &Path) -> PathBuf {
    let dir = log_dir(data_dir);
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("Failed to create logs directory {}: {e}", dir.display());
        }
    }
    dir
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// File (JSON) plus stdout (pretty) logging for headless commands.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init(data_dir: &Path) -> WorkerGuard {
    let dir = prepare_log_dir(data_dir);
    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .pretty()
        .with_filter(env_filter());

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {e}");
    }

    spawn_compression(dir.clone());
    log::info!("Logging to {} (daily rolling)", dir.join(LOG_FILE_NAME).display());
    guard
}

/// File-only logging for the terminal panel.
pub fn init_tui(data_dir: &Path) -> WorkerGuard {
    let dir = prepare_log_dir(data_dir);
    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    // No stdout layer: ratatui is in raw/alternate-screen mode.
    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Logging already initialized: {e}");
    }

    spawn_compression(dir);
    guard
}

fn spawn_compression(dir: PathBuf) {
    std::thread::spawn(move || compress_old_logs(&dir));
}

/// Whether a file in the log directory is a rolled log from a previous day.
fn is_stale_log(name: &str, today_suffix: &str) -> bool {
    name.starts_with(&format!("{LOG_FILE_NAME}."))
        && !name.ends_with(today_suffix)
        && !name.ends_with(".gz")
}

/// Gzip rolled logs older than today.
pub fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_stale_log(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {}", path.display()),
            Err(e) => log::warn!("Failed to compress old log {}: {e}", path.display()),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(());
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
}
