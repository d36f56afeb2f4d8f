//! Storage configuration
//!
//! Configuration for the hybrid overlay engine: chunk granularity and how
//! reads whose length is not a chunk multiple are treated.

/// Default chunk size, the on-disk page size of the archived database
pub const DEFAULT_CHUNK_SIZE: u32 = 0x2000;

/// Exclusive upper bound for the chunk size
pub const MAX_CHUNK_SIZE: u32 = 85_000;

/// Default size cap for growable in-memory files (4 GiB)
pub const DEFAULT_MEMORY_FILE_LIMIT: u64 = 1 << 32;

/// Policy for reads whose length is not a multiple of the chunk size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadAlignment {
    /// Fail the read as unsupported
    #[default]
    Reject,
    /// Report `count` bytes as read without touching the buffer
    ///
    /// Kept for hosts that depend on the historical behaviour.
    Legacy,
}

/// Storage configuration
///
/// Controls how the hybrid engine slices the backing stream into chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Chunk (page) size in bytes
    pub chunk_size: u32,
    /// Treatment of reads that are not a chunk multiple
    pub read_alignment: ReadAlignment,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_alignment: ReadAlignment::Reject,
        }
    }
}

impl StorageConfig {
    /// Create config for testing
    ///
    /// Uses a tiny chunk size so tests can reason about individual bytes.
    pub fn for_testing() -> Self {
        StorageConfig {
            chunk_size: 16,
            ..Default::default()
        }
    }

    /// Set chunk size
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set read alignment policy
    pub fn with_read_alignment(mut self, policy: ReadAlignment) -> Self {
        self.read_alignment = policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chunk_size(self.chunk_size)
    }
}

/// Check `0 < chunk_size < MAX_CHUNK_SIZE`
pub fn validate_chunk_size(chunk_size: u32) -> Result<(), ConfigError> {
    if chunk_size == 0 || chunk_size >= MAX_CHUNK_SIZE {
        return Err(ConfigError::InvalidChunkSize(chunk_size));
    }
    Ok(())
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Chunk size outside `(0, MAX_CHUNK_SIZE)`
    #[error("Invalid chunk size {0}: must be in (0, {MAX_CHUNK_SIZE})")]
    InvalidChunkSize(u32),
}

impl From<ConfigError> for crate::Error {
    fn from(e: ConfigError) -> Self {
        crate::Error::InvalidArgument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.read_alignment, ReadAlignment::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = StorageConfig::default()
            .with_chunk_size(4096)
            .with_read_alignment(ReadAlignment::Legacy);

        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.read_alignment, ReadAlignment::Legacy);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(StorageConfig::default().with_chunk_size(1).validate().is_ok());
        assert!(StorageConfig::default()
            .with_chunk_size(MAX_CHUNK_SIZE - 1)
            .validate()
            .is_ok());
        assert_eq!(
            StorageConfig::default().with_chunk_size(0).validate(),
            Err(ConfigError::InvalidChunkSize(0))
        );
        assert_eq!(
            StorageConfig::default()
                .with_chunk_size(MAX_CHUNK_SIZE)
                .validate(),
            Err(ConfigError::InvalidChunkSize(MAX_CHUNK_SIZE))
        );
    }

    #[test]
    fn test_config_error_maps_to_invalid_argument() {
        let err: crate::Error = ConfigError::InvalidChunkSize(0).into();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("85000"));
    }

    #[test]
    fn test_for_testing() {
        let config = StorageConfig::for_testing();
        assert!(config.chunk_size < DEFAULT_CHUNK_SIZE);
        assert!(config.validate().is_ok());
    }
}
