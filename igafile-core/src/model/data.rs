//! The in-memory geometry model
//!
//! [`IgaData`] only exposes getters. Mutation happens through
//! [`crate::IgaCreator`] or by decoding with [`crate::IgaReader`].
//!
//! Most accessors take indices that must already be valid; they do not
//! range-check beyond Rust's slice indexing, which panics on misuse. Run
//! [`IgaData::validate`] after building or loading a model before trusting
//! its cross references.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use super::records::{Elem, FaceLayout, Piece2D, Point3d, Side};
use crate::format::constants::{INVALID_INDEX, UNIFORM_INTERVAL};

/// Surface type recorded when none is set
pub const DEFAULT_SURFACE_TYPE: &str = "unknown";

/// Control points, coefficient dictionary, topology and adjacency of one surface
#[derive(Debug, Clone, PartialEq)]
pub struct IgaData {
    /// Free-form surface type label
    pub(crate) surface_type: String,
    /// Coefficient dictionary (jagged), referenced by the pieces
    pub(crate) coeffs: Vec<f64>,
    /// Control point geometry, referenced by the pieces
    pub(crate) points: Vec<Point3d>,
    /// Pieces of influence (jagged, indexed from an element)
    pub(crate) pieces: Vec<Piece2D>,
    /// Adjacent element per edge slot (jagged, indexed from an element)
    pub(crate) edges: Vec<u32>,
    /// Parallel to `edges`, or empty for a uniform surface
    pub(crate) intervals: Vec<f64>,
    /// Face layouts, referenced by the elements
    pub(crate) layouts: Vec<FaceLayout>,
    /// The elements, which tie everything else together
    pub(crate) elems: Vec<Elem>,
}

impl Default for IgaData {
    fn default() -> Self {
        Self {
            surface_type: String::from(DEFAULT_SURFACE_TYPE),
            coeffs: Vec::new(),
            points: Vec::new(),
            pieces: Vec::new(),
            edges: Vec::new(),
            intervals: Vec::new(),
            layouts: Vec::new(),
            elems: Vec::new(),
        }
    }
}

static DEFAULT_LAYOUT: FaceLayout = FaceLayout::DEFAULT;

impl IgaData {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the empty model
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether nothing but (possibly) a label is stored
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
            && self.points.is_empty()
            && self.pieces.is_empty()
            && self.edges.is_empty()
            && self.intervals.is_empty()
            && self.layouts.is_empty()
            && self.elems.is_empty()
    }

    /// The saved surface type; `"unknown"` unless one was set
    pub fn surface_type(&self) -> &str {
        &self.surface_type
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    pub fn pieces(&self) -> &[Piece2D] {
        &self.pieces
    }

    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    /// Knot intervals; empty when the surface is fully uniform
    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    pub fn layouts(&self) -> &[FaceLayout] {
        &self.layouts
    }

    pub fn elems(&self) -> &[Elem] {
        &self.elems
    }

    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn elem_count(&self) -> u32 {
        self.elems.len() as u32
    }

    /// Total number of pieces; the next index the builder will hand out
    pub fn piece_count(&self) -> u32 {
        self.pieces.len() as u32
    }

    /// Total number of points; the next index the builder will hand out
    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    /// First edge of an element, or `INVALID_INDEX` for an unknown element
    pub fn edge_begin(&self, elem_index: u32) -> u32 {
        let elem_index = elem_index as usize;
        if elem_index >= self.elems.len() {
            return INVALID_INDEX;
        }
        if elem_index == 0 {
            return 0;
        }
        self.elems[elem_index - 1].edge_end_index
    }

    /// One past the last edge of an element, or `INVALID_INDEX` for an unknown element
    pub fn edge_end(&self, elem_index: u32) -> u32 {
        match self.elems.get(elem_index as usize) {
            Some(elem) => elem.edge_end_index,
            None => INVALID_INDEX,
        }
    }

    /// The edge indices owned by an element
    pub fn edge_range(&self, elem_index: u32) -> Range<u32> {
        self.edge_begin(elem_index)..self.edge_end(elem_index)
    }

    /// The element across an edge, or `INVALID_INDEX` on the boundary
    ///
    /// The edge only knows its neighbour, not the element it belongs to.
    pub fn edge_other(&self, edge_index: u32) -> u32 {
        self.edges[edge_index as usize]
    }

    /// Whether an edge lies on the surface boundary
    pub fn edge_is_boundary(&self, edge_index: u32) -> bool {
        self.edge_other(edge_index) == INVALID_INDEX
    }

    /// Knot interval of an edge; 1.0 when no intervals are stored
    pub fn edge_interval(&self, edge_index: u32) -> f64 {
        if self.intervals.is_empty() {
            return UNIFORM_INTERVAL;
        }
        self.intervals[edge_index as usize]
    }

    /// Edge count declared by the element's layout
    pub fn elem_edge_count(&self, elem_index: u32) -> u32 {
        self.elem_layout(elem_index).edge_count()
    }

    /// Number of edges on one side of an element
    pub fn elem_edges_on_side(&self, elem_index: u32, side: Side) -> u32 {
        self.elem_layout(elem_index).edges_on_side(side)
    }

    /// First edge index on one side of an element
    ///
    /// `side_begin..side_end` is a sub-range of `edge_begin..edge_end` and may
    /// be passed to anything taking an edge index.
    pub fn side_begin(&self, elem_index: u32, side: Side) -> u32 {
        self.edge_begin(elem_index) + self.elem_layout(elem_index).side(side).start
    }

    /// Counterpart to [`IgaData::side_begin`]
    pub fn side_end(&self, elem_index: u32, side: Side) -> u32 {
        self.edge_begin(elem_index) + self.elem_layout(elem_index).side(side).end
    }

    /// Edge indices on one side of an element
    pub fn side_range(&self, elem_index: u32, side: Side) -> Range<u32> {
        self.side_begin(elem_index, side)..self.side_end(elem_index, side)
    }

    /// Layout by index; index 0 is always the default layout, stored or not
    pub fn layout(&self, layout_index: u32) -> &FaceLayout {
        if layout_index == 0 {
            return &DEFAULT_LAYOUT;
        }
        &self.layouts[layout_index as usize]
    }

    /// The layout index used by an element
    pub fn layout_index(&self, elem_index: u32) -> u32 {
        self.elems[elem_index as usize].layout_index
    }

    fn elem_layout(&self, elem_index: u32) -> &FaceLayout {
        self.layout(self.layout_index(elem_index))
    }

    /// First piece owned by an element
    pub fn piece_begin(&self, elem_index: u32) -> u32 {
        if elem_index == 0 {
            0
        } else {
            self.elems[elem_index as usize - 1].piece_end_index
        }
    }

    /// One past the last piece owned by an element
    pub fn piece_end(&self, elem_index: u32) -> u32 {
        self.elems[elem_index as usize].piece_end_index
    }

    /// The piece indices owned by an element
    pub fn piece_range(&self, elem_index: u32) -> Range<u32> {
        self.piece_begin(elem_index)..self.piece_end(elem_index)
    }

    fn piece(&self, piece_index: u32) -> &Piece2D {
        &self.pieces[piece_index as usize]
    }

    /// Whether a piece uses one explicit coefficient block
    pub fn piece_is_explicit(&self, piece_index: u32) -> bool {
        self.piece(piece_index).is_explicit()
    }

    /// Whether a piece is a tensor product of an S run and a T run
    pub fn piece_is_tensor(&self, piece_index: u32) -> bool {
        self.piece(piece_index).is_tensor()
    }

    /// Geometry of the point owned by a piece
    pub fn piece_point(&self, piece_index: u32) -> &Point3d {
        &self.points[self.piece_point_index(piece_index) as usize]
    }

    pub fn piece_point_index(&self, piece_index: u32) -> u32 {
        self.piece(piece_index).pt_index
    }

    pub fn piece_s_order(&self, piece_index: u32) -> usize {
        self.piece(piece_index).s_order()
    }

    pub fn piece_t_order(&self, piece_index: u32) -> usize {
        self.piece(piece_index).t_order()
    }

    /// Start of the S run (or the explicit block) in the coefficient dictionary
    pub fn piece_s_index(&self, piece_index: u32) -> u32 {
        self.piece(piece_index).s_index
    }

    /// Start of the T run; `INVALID_INDEX` for explicit pieces
    pub fn piece_t_index(&self, piece_index: u32) -> u32 {
        self.piece(piece_index).maybe_t_index
    }

    /// The `s_order * t_order` coefficients of an explicit piece
    pub fn piece_explicit_coeffs(&self, piece_index: u32) -> &[f64] {
        let piece = self.piece(piece_index);
        let start = piece.s_index as usize;
        &self.coeffs[start..start + piece.s_order() * piece.t_order()]
    }

    /// Coefficient `(s, t)` of an explicit piece
    pub fn piece_explicit_coeff(&self, piece_index: u32, s: usize, t: usize) -> f64 {
        let piece = self.piece(piece_index);
        self.coeffs[piece.s_index as usize + s + t * piece.s_order()]
    }

    /// Bernstein coefficients in S of a tensor-product piece
    pub fn piece_s_coeffs(&self, piece_index: u32) -> &[f64] {
        let piece = self.piece(piece_index);
        let start = piece.s_index as usize;
        &self.coeffs[start..start + piece.s_order()]
    }

    /// Bernstein coefficients in T of a tensor-product piece
    pub fn piece_t_coeffs(&self, piece_index: u32) -> &[f64] {
        let piece = self.piece(piece_index);
        let start = piece.maybe_t_index as usize;
        &self.coeffs[start..start + piece.t_order()]
    }
}
