//! Runtime configuration for a reconciliation run.
//!
//! Everything the loaders and the writer need is carried in these structs
//! and passed in explicitly; nothing is read from process-wide state
//! after start-up.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable holding the database password
pub const PASSWORD_ENV: &str = "POSTGRES_PASSWORD";

pub const DEFAULT_PLUGIN_ID: &str = "rssfeed";
pub const DEFAULT_STORAGE_KEY: &str = "subscriptions";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} needs to be set")]
    MissingCredential(&'static str),
}

/// How local and stored subscriptions are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReconcilePolicy {
    /// Add newly declared feeds, never remove stored ones (legacy behaviour)
    Additive,
    /// Add newly declared feeds and remove stored feeds no longer declared
    #[default]
    Prune,
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcilePolicy::Additive => write!(f, "additive"),
            ReconcilePolicy::Prune => write!(f, "prune"),
        }
    }
}

/// Connection parameters for the Mattermost database
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    /// Build the config, failing when the password is missing or empty.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: Option<String>,
        database: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingCredential(PASSWORD_ENV))?;

        Ok(Self {
            host: host.into(),
            port,
            user: user.into(),
            password,
            database: database.into(),
        })
    }
}

// Keep the password out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Identifies the single key-value row holding the subscription blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey {
    pub plugin_id: String,
    pub key: String,
}

impl StorageKey {
    pub fn new(plugin_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            key: key.into(),
        }
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self::new(DEFAULT_PLUGIN_ID, DEFAULT_STORAGE_KEY)
    }
}

/// What to reconcile and how
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Path to the feed list file
    pub feed_file: PathBuf,
    /// Channel every declared feed is delivered to
    pub channel_id: String,
    pub policy: ReconcilePolicy,
    /// Compute and report changes without writing them
    pub dry_run: bool,
}
