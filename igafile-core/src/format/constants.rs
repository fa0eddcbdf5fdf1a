//! Format constants and magic bytes for the TSS container

/// Magic bytes at the start of every container
pub const MAGIC: [u8; 8] = *b"#TSS0001";

/// Literal that opens every block header
pub const BLOCK_MARKER: [u8; 8] = *b"\nBLOCK:\n";

/// Reserved 32-bit index meaning "no index": a boundary edge, an explicit
/// piece's missing T run, or a rejected append
pub const INVALID_INDEX: u32 = 0xFFFF_FFFF;

/// Largest order either direction of a piece may have
pub const MAX_ORDER: usize = 0x7FFF;

/// Largest coefficient count an explicit piece may reference
pub const MAX_EXPLICIT_COEFFS: usize = MAX_ORDER * MAX_ORDER;

/// Default ceiling, in bytes, for any single block payload the reader allocates
pub const DEFAULT_MAX_ALLOC: usize = 256_000_000;

/// Knot interval reported for every edge when no interval table is stored
pub const UNIFORM_INTERVAL: f64 = 1.0;
