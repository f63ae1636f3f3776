//! Connection and import settings.
//!
//! The reference tooling hard-coded its SQLite tuning; here the same
//! values are the defaults of an explicit settings struct. Settings can
//! be read from an optional `msrswdb` config file (any format the
//! `config` crate understands) and overridden through `MSRSWDB_*`
//! environment variables.

use serde::Deserialize;

use crate::error::{MsrswdbError, Result};

/// What to do when a tag or attribute is missing from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Fail the whole import on the first unknown name.
    Strict,
    /// Drop the offender and count it in the import report.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Synchronous {
    Off,
    Normal,
    Full,
}
impl Synchronous {
    pub fn pragma(&self) -> &'static str {
        match self {
            Synchronous::Off => "OFF",
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockingMode {
    Normal,
    Exclusive,
}
impl LockingMode {
    pub fn pragma(&self) -> &'static str {
        match self {
            LockingMode::Normal => "NORMAL",
            LockingMode::Exclusive => "EXCLUSIVE",
        }
    }
}

/// SQLite tuning applied at connect time. The defaults suit a one-shot
/// bulk import: single writer, exclusive lock, durability traded away.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub page_size: u32,
    pub cache_size_mb: u32,
    pub synchronous: Synchronous,
    pub locking_mode: LockingMode,
    pub foreign_keys: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            page_size: 4096,
            cache_size_mb: 4,
            synchronous: Synchronous::Off,
            locking_mode: LockingMode::Exclusive,
            foreign_keys: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub policy: UnknownPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub import: ImportSettings,
}

impl Settings {
    /// Reads `msrswdb.{toml,json,yaml,...}` from the working directory
    /// when present, then environment overrides such as
    /// `MSRSWDB_CONNECTION__CACHE_SIZE_MB=16`.
    pub fn load() -> Result<Settings> {
        config::Config::builder()
            .add_source(config::File::with_name("msrswdb").required(false))
            .add_source(config::Environment::with_prefix("MSRSWDB").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| MsrswdbError::Config(e.to_string()))
    }
}
