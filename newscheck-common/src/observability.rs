//! Process-wide `tracing` setup for the binary and integration tests.
//!
//! Events always go to a daily-rotated file (`<app>.<YYYY-MM-DD>.log`) and can
//! be mirrored to stderr. `RUST_LOG` takes precedence over the configured
//! default filter.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const LOG_DIR_ENV: &str = "NEWSCHECK_LOG_DIR";

/// Kept alive for the life of the process so buffered lines are flushed.
struct Installed {
    _flush: WorkerGuard,
    current_file: PathBuf,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used as the log file prefix and the default directory name.
    pub app_name: &'static str,
    /// Falls back to `$NEWSCHECK_LOG_DIR`, then `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Directive used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "newscheck",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::default(),
            default_filter: "info".to_string(),
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber and return today's log file.
///
/// Only the first call installs anything; later calls return the file chosen
/// by the first one.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(done) = INSTALLED.get() {
        return Ok(done.current_file.clone());
    }

    let dir = log_directory(config.app_name, config.log_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.app_name)
        .filename_suffix("log")
        .build(&dir)
        .with_context(|| format!("cannot open log file in {}", dir.display()))?;
    let (file_writer, flush) = tracing_appender::non_blocking(appender);

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    match config.format {
        LogFormat::Text => {
            layers.push(fmt::layer().with_ansi(false).with_writer(file_writer).boxed());
            if config.emit_stderr {
                layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
            }
        }
        LogFormat::Json => {
            layers.push(fmt::layer().json().with_writer(file_writer).boxed());
            if config.emit_stderr {
                layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
            }
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .with_context(|| format!("bad log filter {:?}", config.default_filter))?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    let current_file = dir.join(daily_file_name(config.app_name, Utc::now()));
    let _ = INSTALLED.set(Installed {
        _flush: flush,
        current_file: current_file.clone(),
    });
    Ok(current_file)
}

/// Daily rotation names files by the UTC date, not the local one.
fn daily_file_name(app_name: &str, now: DateTime<Utc>) -> String {
    format!("{app_name}.{}.log", now.format("%Y-%m-%d"))
}

fn log_directory(app_name: &str, explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from))
        .map(|p| under_home(&p))
        .unwrap_or_else(|| match home() {
            Some(h) => h.join(".local/share").join(app_name),
            None => PathBuf::from(app_name),
        })
}

/// `~/x` becomes `$HOME/x`; everything else is returned unchanged.
fn under_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), home()) {
        (Ok(rest), Some(h)) => h.join(rest),
        _ => path.to_path_buf(),
    }
}

fn home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
