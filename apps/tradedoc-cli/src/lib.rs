//! Start-up shared by the `tradedoc-*` binaries.

use std::path::PathBuf;

use tradedoc_core::config::AppConfig;
use tradedoc_core::logging;

/// Load configuration once and install logging from it.
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    logging::init(&config.logging, config.log_file().as_deref())?;
    Ok(config)
}

/// A CLI path option, falling back to the configured location.
pub fn path_or(arg: Option<PathBuf>, configured: PathBuf) -> PathBuf { arg.unwrap_or(configured) }

pub fn banner(title: &str) {
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
}
