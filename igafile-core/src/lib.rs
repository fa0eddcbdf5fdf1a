#![cfg_attr(not(test), no_std)]

//! IGA Core - TSS surface container format definitions
//!
//! This crate provides the geometry model, its validator, the deduplicating
//! builder and the block-stream reader/writer protocols for isogeometric
//! surface files. Byte transport is left to implementors of [`IgaReader`]
//! and [`IgaWriter`].

extern crate alloc;

pub mod config;
pub mod creator;
pub mod error;
pub mod format;
pub mod model;
pub mod reader;
pub mod validation;
pub mod writer;

pub use config::ReadConfig;
pub use creator::{BuildResult, IgaCreator};
pub use error::*;
pub use format::*;
pub use model::*;
pub use reader::{IgaReader, SliceReader};
pub use writer::IgaWriter;
