//! Driver configuration

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default mapping file extension
pub const DEFAULT_FILE_EXTENSION: &str = ".dcm.yml";

/// How ambiguous tree tags are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagPolicy {
    /// Reject a field with several tree tags and a role declared twice
    #[default]
    Strict,
    /// Later declarations of a role overwrite earlier ones; a field with
    /// several tree tags keeps the first of left, right, level
    LastWins,
}

/// Tree mapping driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Directories searched for mapping files, in order
    pub mapping_paths: Vec<PathBuf>,
    /// Mapping file suffix including the leading dot
    pub file_extension: String,
    /// Maximum mapping file size to parse (bytes)
    pub max_file_size: u64,
    /// Maximum number of cached class configurations
    pub cache_capacity: u64,
    /// Seconds a cached configuration stays valid; unset keeps entries until evicted
    pub cache_ttl_secs: Option<u64>,
    /// Handling of ambiguous tags
    pub tag_policy: TagPolicy,
}

impl DriverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from YAML
    ///
    /// # Errors
    /// - `LoadError::Config` if the content does not describe a configuration
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        serde_yaml::from_str(content).map_err(|e| LoadError::Config(e.to_string()))
    }

    /// With an additional mapping directory
    #[inline]
    #[must_use]
    pub fn with_mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_paths.push(path.into());
        self
    }

    /// With file extension
    #[inline]
    #[must_use]
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// With maximum file size
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With cache time-to-live in seconds
    #[inline]
    #[must_use]
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = Some(secs);
        self
    }

    /// Cache time-to-live, if configured
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// With tag policy
    #[inline]
    #[must_use]
    pub fn with_tag_policy(mut self, policy: TagPolicy) -> Self {
        self.tag_policy = policy;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            mapping_paths: Vec::new(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            cache_capacity: 1_000,
            cache_ttl_secs: None,
            tag_policy: TagPolicy::Strict,
        }
    }
}
