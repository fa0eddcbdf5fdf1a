//! Fixed-size records stored in the geometry model
//!
//! Each record is `#[repr(C)]` plain old data; a block payload is exactly the
//! byte image of a slice of these records.

use bytemuck::{Pod, Zeroable};
use core::ops::Range;

use crate::format::constants::INVALID_INDEX;

/// A point in Grassmann (weighted projective) space
///
/// `(0, 0, 0, 0)` marks an unused point index and is always permitted.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Point3d {
    /// The reserved "unused" point
    pub const UNUSED: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// Whether this is the reserved unused point
    pub fn is_unused(&self) -> bool {
        *self == Self::UNUSED
    }
}

/// How a piece addresses the coefficient dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    /// One run of `s_order * t_order` coefficients, indexed `s + t * s_order`
    Explicit { start: u32 },
    /// Separate runs of `s_order` and `t_order` coefficients
    Tensor { s_start: u32, t_start: u32 },
}

/// The influence of a single control point over a single element
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece2D {
    /// s_order in the low 16 bits, t_order in the high 16 bits
    pub st_order: u32,
    /// Start of the S run, or of the whole block for an explicit piece
    pub s_index: u32,
    /// Start of the T run; `INVALID_INDEX` marks an explicit piece
    pub maybe_t_index: u32,
    /// Index of the point holding the geometry for this piece
    pub pt_index: u32,
}

impl Piece2D {
    /// Pack two orders into the `st_order` field
    pub const fn pack_orders(s_order: u16, t_order: u16) -> u32 {
        (s_order as u32) | ((t_order as u32) << 16)
    }

    /// An explicit piece referencing `s_order * t_order` coefficients at `start`
    pub const fn explicit(s_order: u16, t_order: u16, start: u32, pt_index: u32) -> Self {
        Self {
            st_order: Self::pack_orders(s_order, t_order),
            s_index: start,
            maybe_t_index: INVALID_INDEX,
            pt_index,
        }
    }

    /// A tensor-product piece referencing an S run and a T run
    pub const fn tensor(
        s_order: u16,
        t_order: u16,
        s_start: u32,
        t_start: u32,
        pt_index: u32,
    ) -> Self {
        Self {
            st_order: Self::pack_orders(s_order, t_order),
            s_index: s_start,
            maybe_t_index: t_start,
            pt_index,
        }
    }

    pub const fn s_order(&self) -> usize {
        (self.st_order & 0xFFFF) as usize
    }

    pub const fn t_order(&self) -> usize {
        (self.st_order >> 16) as usize
    }

    pub const fn is_explicit(&self) -> bool {
        self.maybe_t_index == INVALID_INDEX
    }

    pub const fn is_tensor(&self) -> bool {
        !self.is_explicit()
    }

    pub const fn kind(&self) -> PieceKind {
        if self.is_explicit() {
            PieceKind::Explicit {
                start: self.s_index,
            }
        } else {
            PieceKind::Tensor {
                s_start: self.s_index,
                t_start: self.maybe_t_index,
            }
        }
    }
}

/// One side of a quadrilateral element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bottom = 0,
    Right = 1,
    Top = 2,
    Left = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Right, Side::Top, Side::Left];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Convert from the numeric side (0 = bottom .. 3 = left)
    pub const fn from_index(value: usize) -> Option<Self> {
        match value {
            0 => Some(Side::Bottom),
            1 => Some(Side::Right),
            2 => Some(Side::Top),
            3 => Some(Side::Left),
            _ => None,
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::Bottom => write!(f, "bottom"),
            Side::Right => write!(f, "right"),
            Side::Top => write!(f, "top"),
            Side::Left => write!(f, "left"),
        }
    }
}

/// The T-junction layout of an element's neighbours
///
/// Edges `side_range[i]..side_range[i + 1]` lie on side `i`, and
/// `side_range[4]` is the element's edge count.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceLayout {
    pub side_range: [u32; 5],
}

impl FaceLayout {
    /// One edge per side; always addressable as layout 0
    pub const DEFAULT: Self = Self::new([0, 1, 2, 3, 4]);

    pub const fn new(side_range: [u32; 5]) -> Self {
        Self { side_range }
    }

    /// Total number of edges on the element
    pub const fn edge_count(&self) -> u32 {
        self.side_range[4]
    }

    /// Element-relative edge range of one side
    pub const fn side(&self, side: Side) -> Range<u32> {
        self.side_range[side.index()]..self.side_range[side.index() + 1]
    }

    /// Number of edges on one side
    pub const fn edges_on_side(&self, side: Side) -> u32 {
        self.side_range[side.index() + 1].wrapping_sub(self.side_range[side.index()])
    }

    /// Whether every side has at least one edge
    pub fn is_well_formed(&self) -> bool {
        self.side_range.windows(2).all(|pair| pair[0] < pair[1])
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An element: cumulative ends into the piece and edge tables plus a layout
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Elem {
    pub piece_end_index: u32,
    pub layout_index: u32,
    pub edge_end_index: u32,
}
