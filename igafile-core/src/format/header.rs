//! Block header record
//!
//! Every block in a TSS container starts with this fixed 32-byte record,
//! stored in the host's native byte order.

use bytemuck::{Pod, Zeroable};
use core::mem::size_of;

use super::constants::BLOCK_MARKER;

/// Fixed-size header preceding each block payload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BlockHeader {
    /// Literal "\nBLOCK:\n"
    pub block_marker: [u8; 8],
    /// Block type tag (see [`super::tag`])
    pub tag: u64,
    /// Block id, unused and written as 0
    pub id: u64,
    /// Payload length in bytes, repeated after the payload
    pub block_len: u64,
}

impl BlockHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = size_of::<Self>();

    /// Create a header for a block of the given tag and payload length
    pub const fn new(tag: u64, id: u64, block_len: u64) -> Self {
        Self {
            block_marker: BLOCK_MARKER,
            tag,
            id,
            block_len,
        }
    }

    /// Whether the header starts with the block marker
    pub fn has_marker(&self) -> bool {
        self.block_marker == BLOCK_MARKER
    }

    /// Parse a header from its raw bytes
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        bytemuck::pod_read_unaligned(bytes)
    }

    /// Raw bytes of the header as written to a stream
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}
