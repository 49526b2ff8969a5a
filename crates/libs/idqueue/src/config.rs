use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::QueueError;

/// Queue settings, usually read from a TOML file:
///
/// ```toml
/// capacity = 4096
/// source_path = "/var/lib/app/seen.bin"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub capacity: usize,
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl QueueConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, source_path: None }
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn from_toml(input: &str) -> Result<Self, QueueError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, QueueError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| QueueError::io(path, err))?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        if self.capacity == 0 {
            return Err(QueueError::invalid_capacity(self.capacity));
        }
        Ok(())
    }
}
