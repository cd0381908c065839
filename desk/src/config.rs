//! Configuration management for the box office desk.
//!
//! Loads configuration from environment variables with sensible defaults.

use boxoffice_core::{AdminCredentials, Limits};
use boxoffice_flatfile::DataFiles;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,boxoffice=debug";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data file locations
    pub data: DataConfig,
    /// Maximum records per collection
    pub limits: Limits,
    /// Administrator login
    pub admin: AdminCredentials,
    /// Log filter directives (`RUST_LOG` syntax)
    pub log_filter: String,
}

/// Data file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the data files
    pub dir: PathBuf,
    /// Users file name, relative to `dir`
    pub users_file: String,
    /// Events file name, relative to `dir`
    pub events_file: String,
    /// Tickets file name, relative to `dir`
    pub tickets_file: String,
}

impl DataConfig {
    /// Full paths of the three data files
    #[must_use]
    pub fn files(&self) -> DataFiles {
        DataFiles {
            users: self.dir.join(&self.users_file),
            events: self.dir.join(&self.events_file),
            tickets: self.dir.join(&self.tickets_file),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let limits = Limits::default();
        let admin = AdminCredentials::default();

        Self {
            data: DataConfig {
                dir: lookup("BOXOFFICE_DATA_DIR")
                    .map_or_else(|| PathBuf::from("."), PathBuf::from),
                users_file: lookup("BOXOFFICE_USERS_FILE")
                    .unwrap_or_else(|| DataFiles::USERS_FILE.to_string()),
                events_file: lookup("BOXOFFICE_EVENTS_FILE")
                    .unwrap_or_else(|| DataFiles::EVENTS_FILE.to_string()),
                tickets_file: lookup("BOXOFFICE_TICKETS_FILE")
                    .unwrap_or_else(|| DataFiles::TICKETS_FILE.to_string()),
            },
            limits: Limits {
                max_users: lookup("BOXOFFICE_MAX_USERS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(limits.max_users),
                max_events: lookup("BOXOFFICE_MAX_EVENTS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(limits.max_events),
                max_tickets: lookup("BOXOFFICE_MAX_TICKETS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(limits.max_tickets),
            },
            admin: AdminCredentials {
                username: lookup("BOXOFFICE_ADMIN_USERNAME").unwrap_or(admin.username),
                password: lookup("BOXOFFICE_ADMIN_PASSWORD").unwrap_or(admin.password),
            },
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}
