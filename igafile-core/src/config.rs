//! Decoder configuration

use crate::format::constants::DEFAULT_MAX_ALLOC;

/// Limits applied while decoding a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Largest block payload, in bytes, the decoder will allocate for
    pub max_alloc: usize,
}

impl ReadConfig {
    /// Create config with an allocation ceiling
    pub const fn with_max_alloc(max_alloc: usize) -> Self {
        Self { max_alloc }
    }
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self::with_max_alloc(DEFAULT_MAX_ALLOC)
    }
}
