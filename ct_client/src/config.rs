//! Tracker configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use card_tracker::table::DEFAULT_INBOX_CAPACITY;
use std::{collections::HashSet, path::PathBuf};

/// Default reader devices, one per physical antenna.
pub const DEFAULT_CHANNELS: &str = "/dev/ttyACM0,/dev/ttyACM1";

/// Most channels the table has antennas for.
pub const MAX_CHANNELS: usize = 2;

/// Complete tracker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Reader devices, read concurrently
    pub channels: Vec<PathBuf>,
    /// JSON file mapping tag ids to card codes
    pub registry_path: PathBuf,
    /// Directory for per-session hand logs
    pub log_dir: PathBuf,
    /// File diagnostics are written to
    pub diagnostics_log: PathBuf,
    /// Tracker actor inbox size
    pub inbox_capacity: usize,
}

/// Values given on the command line, taking priority over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub channels: Option<String>,
    pub registry_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub diagnostics_log: Option<PathBuf>,
}

impl TrackerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values from CLI args, used before the environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but malformed
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let channels = overrides
            .channels
            .or_else(|| std::env::var("TRACKER_CHANNELS").ok())
            .unwrap_or_else(|| DEFAULT_CHANNELS.to_string());

        let registry_path = overrides
            .registry_path
            .or_else(|| std::env::var("TRACKER_REGISTRY").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("tags.json"));

        let log_dir = overrides
            .log_dir
            .or_else(|| std::env::var("TRACKER_LOG_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("log"));

        let diagnostics_log = overrides
            .diagnostics_log
            .or_else(|| {
                std::env::var("TRACKER_DIAGNOSTICS_LOG")
                    .ok()
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from("card_tracker.log"));

        let inbox_capacity = match std::env::var("TRACKER_INBOX_CAPACITY") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "TRACKER_INBOX_CAPACITY".to_string(),
                reason: format!("'{raw}' is not a number"),
            })?,
            Err(_) => DEFAULT_INBOX_CAPACITY,
        };

        Ok(TrackerConfig {
            channels: split_channels(&channels),
            registry_path,
            log_dir,
            diagnostics_log,
            inbox_capacity,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::Invalid {
                var: "TRACKER_CHANNELS".to_string(),
                reason: "At least one channel is required".to_string(),
            });
        }

        if self.channels.len() > MAX_CHANNELS {
            return Err(ConfigError::Invalid {
                var: "TRACKER_CHANNELS".to_string(),
                reason: format!(
                    "At most {MAX_CHANNELS} channels are supported, got {}",
                    self.channels.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.channels.iter().find(|path| !seen.insert(*path)) {
            return Err(ConfigError::Invalid {
                var: "TRACKER_CHANNELS".to_string(),
                reason: format!("Channel {} is listed twice", duplicate.display()),
            });
        }

        if self.inbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "TRACKER_INBOX_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Split a comma-separated channel list, skipping empty entries.
fn split_channels(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}
