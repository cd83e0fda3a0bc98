//! Command-line flags for `backroom`. Flags beat environment variables,
//! which beat the config file, which beats built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// Backroom: the back-office dashboard assistant, in your terminal.
#[derive(Parser, Debug)]
#[command(name = "backroom", version, about)]
pub struct CliArgs {
    /// TOML config file to read.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON file with the dashboard statistics snapshot.
    #[arg(short = 's', long = "stats", value_name = "PATH")]
    pub stats: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `backroom_chat=trace`.
    #[arg(short = 'l', long = "log-level", value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Open the chat widget immediately instead of waiting for `/open`.
    #[arg(long = "open")]
    pub open: bool,
}

impl CliArgs {
    /// `--config`, else `$BACKROOM_CONFIG`, else `~/.backroom/config.toml`.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var_os("BACKROOM_CONFIG").map(PathBuf::from))
            .unwrap_or_else(default_config_path)
    }

    /// `--stats`, else the config value. `None` selects the built-in sample.
    pub fn resolve_stats_path(&self, from_config: &str) -> Option<PathBuf> {
        self.stats
            .clone()
            .or_else(|| (!from_config.is_empty()).then(|| PathBuf::from(from_config)))
    }

    /// `--log-level`, else the config value.
    pub fn resolve_log_level(&self, from_config: &str) -> String {
        match &self.log_level {
            Some(level) => level.clone(),
            None => from_config.to_owned(),
        }
    }
}

fn default_config_path() -> PathBuf {
    let home_var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    match std::env::var_os(home_var) {
        Some(home) => PathBuf::from(home).join(".backroom").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
