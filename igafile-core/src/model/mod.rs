//! Geometry model: fixed-size records and the jagged-array aggregate

pub mod data;
pub mod records;

pub use data::{IgaData, DEFAULT_SURFACE_TYPE};
pub use records::{Elem, FaceLayout, Piece2D, PieceKind, Point3d, Side};
