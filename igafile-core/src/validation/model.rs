//! Structural validation of a populated [`IgaData`]
//!
//! One linear pass per array, no recursion. Only the first problem is
//! reported; the goal is to reliably detect that the model is unusable.

use hashbrown::HashSet;

use super::bounds::range_in_bounds;
use crate::error::ValidationError;
use crate::format::constants::INVALID_INDEX;
use crate::model::{FaceLayout, IgaData};

type Result = core::result::Result<(), ValidationError>;

impl IgaData {
    /// Check every structural invariant of the model
    ///
    /// Decoding or building successfully only guarantees well-formed arrays;
    /// this is the check that all of their cross references agree. The
    /// returned error displays as a human-readable diagnostic.
    pub fn validate(&self) -> Result {
        let result = self
            .validate_numbers()
            .and_then(|()| self.validate_layouts())
            .and_then(|()| self.validate_pieces())
            .and_then(|()| self.validate_intervals())
            .and_then(|()| self.validate_edges())
            .and_then(|()| self.validate_elems());
        if let Err(err) = &result {
            log::debug!("IGA model failed validation: {err}");
        }
        result
    }

    /// Whether every internal index refers to a legal value
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate_numbers(&self) -> Result {
        if let Some(index) = self.coeffs.iter().position(|c| !c.is_finite()) {
            return Err(ValidationError::NonFiniteCoeff { index });
        }
        // Zero weights are not rejected: (0,0,0,0) marks unused point indices
        if let Some(index) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(ValidationError::NonFinitePoint { index });
        }
        Ok(())
    }

    fn validate_layouts(&self) -> Result {
        // Only applies when layouts are stored at all
        if let Some(first) = self.layouts.first() {
            if !first.is_default() {
                return Err(ValidationError::NonDefaultFirstLayout);
            }
        }

        let mut seen: HashSet<FaceLayout> = HashSet::with_capacity(self.layouts.len());
        for (index, layout) in self.layouts.iter().enumerate() {
            if !layout.is_well_formed() {
                return Err(ValidationError::DegenerateLayout { index });
            }
            seen.insert(*layout);
        }
        if seen.len() != self.layouts.len() {
            return Err(ValidationError::DuplicateLayouts);
        }

        // Variable topology needs explicit intervals
        if self.layouts.len() > 1 && self.intervals.is_empty() {
            return Err(ValidationError::MissingIntervals);
        }
        Ok(())
    }

    fn validate_pieces(&self) -> Result {
        let total = self.coeffs.len();
        for (piece_index, piece) in self.pieces.iter().enumerate() {
            if piece.pt_index as usize >= self.points.len() {
                return Err(ValidationError::PointOutOfBounds { piece: piece_index });
            }
            let (s_order, t_order) = (piece.s_order(), piece.t_order());
            if piece.is_explicit() {
                if !range_in_bounds(piece.s_index, s_order * t_order, total) {
                    return Err(ValidationError::ExplicitCoeffsOutOfBounds { piece: piece_index });
                }
            } else {
                if !range_in_bounds(piece.s_index, s_order, total) {
                    return Err(ValidationError::TensorSCoeffsOutOfBounds { piece: piece_index });
                }
                if !range_in_bounds(piece.maybe_t_index, t_order, total) {
                    return Err(ValidationError::TensorTCoeffsOutOfBounds { piece: piece_index });
                }
            }
        }
        Ok(())
    }

    fn validate_intervals(&self) -> Result {
        if !self.intervals.is_empty() && self.intervals.len() != self.edges.len() {
            return Err(ValidationError::IntervalCountMismatch {
                edges: self.edges.len(),
                intervals: self.intervals.len(),
            });
        }
        if let Some(edge) = self
            .intervals
            .iter()
            .position(|&interval| !(interval >= 0.0 && interval.is_finite()))
        {
            return Err(ValidationError::IllegalInterval { edge });
        }
        Ok(())
    }

    fn validate_edges(&self) -> Result {
        let elem_count = self.elems.len();
        for (edge, &other) in self.edges.iter().enumerate() {
            if other != INVALID_INDEX && other as usize >= elem_count {
                return Err(ValidationError::EdgeOutOfBounds { edge, elem: other });
            }
        }
        Ok(())
    }

    fn validate_elems(&self) -> Result {
        let mut last_edge_end = 0u32;
        let mut last_piece_end = 0u32;
        for (elem_index, elem) in self.elems.iter().enumerate() {
            if elem.edge_end_index < last_edge_end {
                return Err(ValidationError::EdgeEndDecreasing { elem: elem_index });
            }
            if elem.edge_end_index as usize > self.edges.len() {
                return Err(ValidationError::EdgeEndOutOfBounds { elem: elem_index });
            }
            if elem.piece_end_index < last_piece_end {
                return Err(ValidationError::PieceEndDecreasing { elem: elem_index });
            }
            if elem.piece_end_index as usize > self.pieces.len() {
                return Err(ValidationError::PieceEndOutOfBounds { elem: elem_index });
            }
            // Layout 0 need not be stored
            if elem.layout_index != 0 && elem.layout_index as usize >= self.layouts.len() {
                return Err(ValidationError::LayoutOutOfBounds {
                    elem: elem_index,
                    layout: elem.layout_index,
                });
            }
            let found = elem.edge_end_index - last_edge_end;
            let expected = self.layout(elem.layout_index).edge_count();
            if found != expected {
                return Err(ValidationError::EdgeCountMismatch {
                    elem: elem_index,
                    found,
                    expected,
                });
            }
            last_edge_end = elem.edge_end_index;
            last_piece_end = elem.piece_end_index;
        }
        if last_edge_end as usize != self.edges.len() || last_piece_end as usize != self.pieces.len()
        {
            return Err(ValidationError::OrphanedEntries);
        }
        Ok(())
    }
}
