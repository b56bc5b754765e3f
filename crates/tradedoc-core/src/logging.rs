use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the process-wide `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. When `log_file` is given
/// events are appended there (no ANSI colour) instead of going to stderr.
pub fn init(config: &LoggingConfig, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)?; }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}
