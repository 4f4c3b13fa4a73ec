//! Store configuration.
//!
//! # Responsibility
//! - Describe where records live and how logging is set up.
//! - Build the matching record source and service.

use crate::logging::{default_log_level, init_logging};
use crate::persist::{
    JsonFileSource, MemorySource, PersistResult, RecordSource, SqliteSource,
};
use crate::service::user_service::{ServiceResult, UserService};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DATA_PATH: &str = "database.json";

/// Persistence backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Single JSON document (`database.json` layout).
    #[default]
    Json,
    /// SQLite database file.
    Sqlite,
    /// Nothing is read or written to disk.
    Memory,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unsupported backend `{other}`; expected json|sqlite|memory"
            )),
        }
    }
}

/// Configuration for opening a user service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Record file; ignored by the memory backend.
    pub data_path: PathBuf,
    pub backend: Backend,
    pub log_level: String,
    /// Absolute log directory. Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            backend: Backend::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)
    }

    /// Builds the configured record source.
    pub fn open_source(&self) -> PersistResult<Box<dyn RecordSource>> {
        let source: Box<dyn RecordSource> = match self.backend {
            Backend::Json => Box::new(JsonFileSource::new(&self.data_path)),
            Backend::Sqlite => Box::new(SqliteSource::open(&self.data_path)?),
            Backend::Memory => Box::new(MemorySource::new()),
        };
        Ok(source)
    }

    /// Builds the configured source and loads a service from it.
    pub fn open_service(&self) -> ServiceResult<UserService<Box<dyn RecordSource>>> {
        UserService::open(self.open_source()?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, StoreConfig};
    use crate::persist::RecordSource;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!(" json ".parse::<Backend>().unwrap(), Backend::Json);
        assert!("redis".parse::<Backend>().unwrap_err().contains("unsupported"));
    }

    #[test]
    fn default_config_uses_json_file() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.data_path.to_str(), Some("database.json"));
        assert!(config.log_dir.is_none());
        assert!(config.init_logging().is_ok());
    }

    #[test]
    fn memory_backend_opens_empty_service() {
        let config = StoreConfig {
            backend: Backend::Memory,
            ..StoreConfig::default()
        };
        let service = config.open_service().unwrap();
        assert!(service.store().is_empty());
        assert_eq!(service.source().backend(), "memory");
    }
}
