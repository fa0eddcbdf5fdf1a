//! Binary format definitions for the TSS container
//!
//! This module contains pure data structure definitions for the wire format.
//! The read/write protocols live in [`crate::reader`] and [`crate::writer`].

pub mod constants;
pub mod header;
pub mod tag;

pub use constants::*;
pub use header::BlockHeader;
pub use tag::{tag_text, tag_value, BlockKind};
