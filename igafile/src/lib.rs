//! IGA File - TSS surface containers on disk
//!
//! This library loads and saves isogeometric surface files in the TSS block
//! container format, on top of the no_std format core.
//!
//! ## Architecture
//!
//! - **igafile-core**: geometry model, validator, builder and block protocols (no I/O)
//! - **igafile**: `std::io` adapters, memory-mapped loading, reports and the `igainfo` CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use igafile::{IgaFile, ReadConfig};
//!
//! fn example() -> igafile::Result<()> {
//!     let file = IgaFile::load_valid("surface.iga", &ReadConfig::default())?;
//!     println!("{} elements", file.data.elem_count());
//!     igafile::report::write_report(&file.data, std::io::stdout().lock())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap**: decode files through a read-only memory map
//! - **serde**: serde derives on model records and a JSON summary
//! - **cli**: the `igainfo` inspection binary

// Re-export the format core
pub use igafile_core::{
    // Model
    Elem, FaceLayout, IgaData, Piece2D, PieceKind, Point3d, Side,
    // Builder
    BuildError, IgaCreator,
    // Protocols
    IgaError, IgaReader, IgaWriter, ReadConfig, SliceReader,
    // Validation
    ValidationError,
    // Format constants
    DEFAULT_MAX_ALLOC, INVALID_INDEX,
};

pub mod error;
pub mod file;
pub mod report;
pub mod stream;

pub use error::{Error, Result};
pub use file::IgaFile;
pub use report::{write_report, IgaSummary};
pub use stream::{StreamReader, StreamWriter};
