use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TICK_RATE_MS: u64 = 1000;

#[derive(Parser, Debug, Default)]
#[command(name = "etrace", about = "Terminal timeline for GitHub activity events")]
pub struct Cli {
    /// Path to a JSON array of GitHub API events
    #[arg(long, short, env = "ETRACE_EVENTS")]
    pub events: Option<PathBuf>,

    /// Log file path
    #[arg(long, env = "ETRACE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print facets and rendered events as JSON instead of starting the UI
    #[arg(long)]
    pub json: bool,

    /// UI tick rate in milliseconds
    #[arg(long)]
    pub tick_rate: Option<u64>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    pub events: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub tick_rate: Option<u64>,
}

impl ConfigFile {
    /// Reads `<config_dir>/etrace/config.toml`. A missing file is `Ok(None)`;
    /// a file that does not parse is returned as an error for the caller to
    /// report once logging is up.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match dirs::config_dir() {
            Some(dir) => Self::from_path(&dir.join("etrace").join("config.toml")),
            None => Ok(None),
        }
    }

    pub fn from_path(path: &Path) -> Result<Option<Self>, ConfigError> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Ok(None);
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Malformed {
                path: path.display().to_string(),
                source,
            })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no events file given (use --events, ETRACE_EVENTS or the config file)")]
    MissingEvents,

    #[error("ignoring config file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Effective settings: command line first, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub events: PathBuf,
    pub log_file: Option<PathBuf>,
    pub json: bool,
    pub tick_rate: Duration,
}

impl Settings {
    pub fn resolve(cli: Cli, file: Option<ConfigFile>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let events = cli.events.or(file.events).ok_or(ConfigError::MissingEvents)?;
        let tick_rate = cli
            .tick_rate
            .or(file.tick_rate)
            .unwrap_or(DEFAULT_TICK_RATE_MS);

        Ok(Self {
            events,
            log_file: cli.log_file.or(file.log_file),
            json: cli.json,
            tick_rate: Duration::from_millis(tick_rate.max(1)),
        })
    }
}
