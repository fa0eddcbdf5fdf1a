//! Validation utilities
//!
//! `bounds` holds the pure sizing arithmetic used by the reader and builder;
//! `model` implements [`crate::IgaData::validate`].

pub mod bounds;
mod model;

pub use bounds::{element_count, next_index, range_in_bounds, within_alloc_limit};
