//! Volume configuration

use bakmount_core::{ConfigError, StorageConfig, DEFAULT_MEMORY_FILE_LIMIT};

/// Volume configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeConfig {
    /// Configuration for every archived file's overlay storage
    pub storage: StorageConfig,
    /// Extensions (without the dot) of files the host may create
    pub creatable_extensions: Vec<String>,
    /// Largest length a created file may grow to
    pub memory_file_limit: u64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        VolumeConfig {
            storage: StorageConfig::default(),
            creatable_extensions: vec!["ldf".to_string()],
            memory_file_limit: DEFAULT_MEMORY_FILE_LIMIT,
        }
    }
}

impl VolumeConfig {
    /// Create config for testing
    ///
    /// Uses the small testing chunk size.
    pub fn for_testing() -> Self {
        VolumeConfig {
            storage: StorageConfig::for_testing(),
            ..Default::default()
        }
    }

    /// Set storage configuration
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Allow creating files with `extension`
    pub fn with_creatable_extension(mut self, extension: impl Into<String>) -> Self {
        self.creatable_extensions.push(extension.into());
        self
    }

    /// Set the size cap for created files
    pub fn with_memory_file_limit(mut self, limit: u64) -> Self {
        self.memory_file_limit = limit;
        self
    }

    /// True if a file called `name` may be created
    pub fn is_creatable(&self, name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .creatable_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()
    }
}
