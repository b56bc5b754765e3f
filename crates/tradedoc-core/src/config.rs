//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `TRADEDOC_*` env vars (`__` separates sections, so
//! `TRADEDOC_SPLIT__SEED=7` sets `split.seed`). The result is one explicit
//! [`AppConfig`] value that callers pass down; nothing is global.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub split: SplitConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base that every relative path below is resolved against.
    pub root: String,
    pub raw_dir: String,
    pub annotations_dir: String,
    pub ground_truth_dir: String,
    pub docs_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            raw_dir: "data/raw".to_string(),
            annotations_dir: "data/ground_truth/annotated".to_string(),
            ground_truth_dir: "data/ground_truth".to_string(),
            docs_dir: "docs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self { Self { train: 0.7, validation: 0.15, test: 0.15, seed: 42 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub samples_per_type: usize,
    pub preview_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self { Self { samples_per_type: 5, preview_chars: 500 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let config: AppConfig = Self::figment(Path::new("."), env_name)
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Provider chain rooted at `base`; later providers win.
    pub fn figment(base: &Path, env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment.merge(Env::prefixed("TRADEDOC_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [("train", self.split.train), ("validation", self.split.validation), ("test", self.split.test)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::InvalidConfig(format!("split.{} must be within [0, 1], got {}", name, ratio)));
            }
        }
        if self.analysis.samples_per_type == 0 {
            return Err(Error::InvalidConfig("analysis.samples_per_type must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn root_dir(&self) -> PathBuf { expand_path(&self.paths.root) }

    pub fn raw_dir(&self) -> PathBuf { resolve_with_base(&self.root_dir(), &self.paths.raw_dir) }

    pub fn annotations_dir(&self) -> PathBuf { resolve_with_base(&self.root_dir(), &self.paths.annotations_dir) }

    pub fn ground_truth_dir(&self) -> PathBuf { resolve_with_base(&self.root_dir(), &self.paths.ground_truth_dir) }

    pub fn docs_dir(&self) -> PathBuf { resolve_with_base(&self.root_dir(), &self.paths.docs_dir) }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.as_deref().map(|f| resolve_with_base(&self.root_dir(), f))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
