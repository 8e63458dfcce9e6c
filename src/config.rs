use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::Deserialize;

use crate::paths;

const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// How long the event loop waits for input before redrawing.
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

impl Config {
    /// Load config from `path`, or `~/.taskboard/config.toml` when `None`.
    /// Returns default config if the file doesn't exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(Path::new(p)),
            None => Self::load_from(Path::new(&paths::config_path())),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.ui.poll_interval_ms == Some(0) {
            bail!("{}: ui.poll_interval_ms must be positive", path.display());
        }
        if let Some(level) = &self.log.level {
            if LevelFilter::from_str(level).is_err() {
                bail!("{}: unknown log level '{level}'", path.display());
            }
        }
        Ok(())
    }

    /// Database path: the CLI value wins, then the config file, then the default.
    pub fn db_path(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.storage.path.clone())
            .unwrap_or_else(paths::db_path)
    }

    pub fn log_path(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.log.file.clone())
            .unwrap_or_else(paths::log_path)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log
            .level
            .as_deref()
            .and_then(|l| LevelFilter::from_str(l).ok())
            .unwrap_or(LevelFilter::Info)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.ui.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }
}
