//! Error types for IGA container operations

use thiserror::Error;

/// Errors that can occur while decoding or encoding an IGA container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IgaError {
    /// The byte source or sink failed, including short reads
    #[error("stream read/write failed")]
    Stream,
    /// The leading magic bytes were not "#TSS0001"
    #[error("invalid TSS magic header")]
    BadMagic,
    /// The first block was not the IGAFILE marker block
    #[error("missing IGAFILE marker block")]
    BadFileMarker,
    /// A block header did not start with the block marker
    #[error("block header does not start with the block marker")]
    BadBlockMarker,
    /// The payload length is not a whole number of elements
    #[error("block {tag:#018x} has length {len}, not a multiple of {elem_size}")]
    MisalignedBlock { tag: u64, len: u64, elem_size: usize },
    /// The trailing length did not repeat the declared length
    #[error("block length {declared} does not match trailing length {trailing}")]
    LengthMismatch { declared: u64, trailing: u64 },
    /// The declared payload would exceed the configured allocation ceiling
    #[error("block length {len} exceeds the allocation limit of {max} bytes")]
    AllocationLimit { len: u64, max: usize },
}

/// Errors reported by [`crate::IgaCreator`] when an append is rejected
///
/// A rejected append never modifies the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The target array has no 32-bit index left to hand out
    #[error("32-bit index space exhausted")]
    IndexOverflow,
    /// Edges were added both with and without knot intervals
    #[error("edges must either all carry an interval or none may")]
    InconsistentIntervals,
    /// A knot interval was NaN or infinite
    #[error("knot interval is not finite")]
    NonFiniteInterval,
    /// A coefficient was NaN or infinite
    #[error("coefficient vector contains a non-finite value")]
    NonFiniteCoefficient,
    /// A piece order fell outside 0..=0x7FFF
    #[error("order {order} is outside 0..=0x7FFF")]
    OrderOutOfRange { order: usize },
    /// An explicit piece has more coefficients than any pair of orders can address
    #[error("{len} coefficients exceed the explicit piece limit")]
    TooManyCoefficients { len: usize },
    /// The coefficient count is not s_order times a whole t_order
    #[error("{len} coefficients cannot be split into rows of {s_order}")]
    OrderMismatch { s_order: usize, len: usize },
    /// finish_elem was given a layout that is not stored
    #[error("layout index {index} is out of range")]
    LayoutOutOfRange { index: u32 },
    /// The edges added for an element disagree with its layout
    #[error("element has {found} edges but its layout declares {expected}")]
    EdgeCountMismatch { found: usize, expected: u32 },
}

/// The first structural problem found by [`crate::IgaData::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A dictionary coefficient is NaN or infinite
    #[error("Coeff {index} is not finite or is Not A Number")]
    NonFiniteCoeff { index: usize },
    /// A control point has a NaN or infinite component
    #[error("Point {index} has non-finite/NAN values")]
    NonFinitePoint { index: usize },
    /// Layout 0 exists but is not the default layout
    #[error("Layout 0 must be the default layout")]
    NonDefaultFirstLayout,
    /// A layout leaves some side without an edge
    #[error("Layout {index} doesn't have at least one edge on each side")]
    DegenerateLayout { index: usize },
    /// Two stored layouts are equal
    #[error("Some of the face layouts were duplicates; face layouts must be unique")]
    DuplicateLayouts,
    /// Several layouts are stored but the interval table is empty
    #[error("The model has multiple face layouts but doesn't specify edge intervals")]
    MissingIntervals,
    /// A piece names a point past the point table
    #[error("Piece {piece} has an out-of-bounds point index")]
    PointOutOfBounds { piece: usize },
    /// An explicit piece's coefficient block runs past the dictionary
    #[error("Piece {piece} refers to out-of-bounds coefficients")]
    ExplicitCoeffsOutOfBounds { piece: usize },
    /// A tensor piece's S run runs past the dictionary
    #[error("Piece {piece} (tensor product) refers to out-of-bounds coefficients in S")]
    TensorSCoeffsOutOfBounds { piece: usize },
    /// A tensor piece's T run runs past the dictionary
    #[error("Piece {piece} (tensor product) refers to out-of-bounds coefficients in T")]
    TensorTCoeffsOutOfBounds { piece: usize },
    /// The interval table is neither empty nor one entry per edge
    #[error("{intervals} intervals for {edges} edges; the tables must match unless intervals is empty")]
    IntervalCountMismatch { edges: usize, intervals: usize },
    /// An interval is negative or not finite
    #[error("Interval on edge {edge} has an illegal value (must be >= 0.0 and finite)")]
    IllegalInterval { edge: usize },
    /// An edge names a neighbour past the element table
    #[error("Edge {edge} is adjacent to out-of-bounds element {elem}")]
    EdgeOutOfBounds { edge: usize, elem: u32 },
    /// Element edge ranges go backwards
    #[error("Elem {elem} has an edge_end_index below the previous element's")]
    EdgeEndDecreasing { elem: usize },
    /// An element edge range ends past the edge table
    #[error("Elem {elem} has an edge_end_index past the end of the edge table")]
    EdgeEndOutOfBounds { elem: usize },
    /// Element piece ranges go backwards
    #[error("Elem {elem} has a piece_end_index below the previous element's")]
    PieceEndDecreasing { elem: usize },
    /// An element piece range ends past the piece table
    #[error("Elem {elem} has a piece_end_index past the end of the piece table")]
    PieceEndOutOfBounds { elem: usize },
    /// An element names a layout that is not stored
    #[error("Elem {elem} refers to layout {layout}, which is not stored")]
    LayoutOutOfBounds { elem: usize, layout: u32 },
    /// An element's edge count differs from its layout's
    #[error("Elem {elem} has {found} edges but its layout has {expected} edges")]
    EdgeCountMismatch { elem: usize, found: u32, expected: u32 },
    /// The last element does not end exactly at the edge and piece table ends
    #[error("The elements do not refer to all the edges/pieces")]
    OrphanedEntries,
}

/// Result type for IGA container operations
pub type Result<T> = core::result::Result<T, IgaError>;
