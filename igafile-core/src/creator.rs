//! Incremental construction of an [`IgaData`]
//!
//! [`IgaCreator`] holds the only write handle to a model while it is being
//! built, plus the lookup tables that keep the coefficient and layout
//! dictionaries free of exact duplicates.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::error::BuildError;
use crate::format::constants::{MAX_EXPLICIT_COEFFS, MAX_ORDER};
use crate::model::{Elem, FaceLayout, IgaData, Piece2D, Point3d};
use crate::validation::next_index;

/// Result type for builder operations
pub type BuildResult<T> = core::result::Result<T, BuildError>;

/// Exact-match key for a coefficient vector
///
/// Keys are the f64 bit patterns with `-0.0` folded into `+0.0`, so two
/// vectors share a key exactly when they compare equal element by element.
/// NaN never reaches the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CoeffKey(Vec<u64>);

impl CoeffKey {
    fn new(coeffs: &[f64]) -> Self {
        Self(
            coeffs
                .iter()
                .map(|&c| if c == 0.0 { 0 } else { c.to_bits() })
                .collect(),
        )
    }
}

/// Append one entry, refusing once the 32-bit index space or memory runs out
fn append<T>(vec: &mut Vec<T>, value: T) -> BuildResult<u32> {
    let index = next_index(vec.len()).ok_or(BuildError::IndexOverflow)?;
    vec.try_reserve(1).map_err(|_| BuildError::IndexOverflow)?;
    vec.push(value);
    Ok(index)
}

/// Refuse a dictionary growth of `extra` values that would leave the 32-bit index space
fn ensure_coeff_space(len: usize, extra: usize) -> BuildResult<()> {
    let end = len.checked_add(extra).ok_or(BuildError::IndexOverflow)?;
    next_index(len).ok_or(BuildError::IndexOverflow)?;
    next_index(end).ok_or(BuildError::IndexOverflow)?;
    Ok(())
}

/// Convert an order to its packed 16-bit form
fn checked_order(order: usize) -> BuildResult<u16> {
    if order > MAX_ORDER {
        return Err(BuildError::OrderOutOfRange { order });
    }
    Ok(order as u16)
}

/// Derive and check `(s_order, t_order)` for an explicit block of `len` coefficients
fn explicit_orders(s_order: usize, len: usize) -> BuildResult<(u16, u16)> {
    if len > MAX_EXPLICIT_COEFFS {
        return Err(BuildError::TooManyCoefficients { len });
    }
    let s = checked_order(s_order)?;
    let t_order = len
        .checked_div(s_order)
        .ok_or(BuildError::OrderMismatch { s_order, len })?;
    let t = checked_order(t_order)?;
    if s_order * t_order != len {
        return Err(BuildError::OrderMismatch { s_order, len });
    }
    Ok((s, t))
}

/// Adds data to an [`IgaData`], deduplicating coefficient vectors and layouts
///
/// Creating the builder clears the target model. Every index-returning call
/// either appends and returns the new (or reused) index, or returns an error
/// and leaves the model untouched.
pub struct IgaCreator<'a> {
    parent: &'a mut IgaData,
    coeff_lookup: HashMap<CoeffKey, u32>,
    layout_lookup: HashMap<FaceLayout, u32>,
}

impl<'a> IgaCreator<'a> {
    /// Start building into `parent`, discarding whatever it held
    pub fn new(parent: &'a mut IgaData) -> Self {
        parent.clear();
        Self {
            parent,
            coeff_lookup: HashMap::new(),
            layout_lookup: HashMap::new(),
        }
    }

    /// The model built so far
    pub fn data(&self) -> &IgaData {
        self.parent
    }

    /// Append a coefficient run without consulting the dictionary
    ///
    /// Returns the index of the first coefficient; the run occupies the
    /// following `coeffs.len()` indices.
    pub fn add_coeffs(&mut self, coeffs: &[f64]) -> BuildResult<u32> {
        let dict = &mut self.parent.coeffs;
        ensure_coeff_space(dict.len(), coeffs.len())?;
        let start = dict.len() as u32;
        dict.try_reserve(coeffs.len())
            .map_err(|_| BuildError::IndexOverflow)?;
        dict.extend_from_slice(coeffs);
        Ok(start)
    }

    /// Append an edge adjacent to `elem` (or `INVALID_INDEX` for the boundary)
    ///
    /// Pass `knot_interval >= 0.0` to record an interval or any negative
    /// value to record none. Every edge added through one builder must make
    /// the same choice.
    pub fn add_edge(&mut self, elem: u32, knot_interval: f64) -> BuildResult<u32> {
        if knot_interval.is_nan() || knot_interval == f64::INFINITY {
            return Err(BuildError::NonFiniteInterval);
        }
        let edges = &mut self.parent.edges;
        let intervals = &mut self.parent.intervals;

        if knot_interval >= 0.0 {
            if intervals.len() != edges.len() {
                return Err(BuildError::InconsistentIntervals);
            }
            next_index(edges.len()).ok_or(BuildError::IndexOverflow)?;
            intervals
                .try_reserve(1)
                .map_err(|_| BuildError::IndexOverflow)?;
            let index = append(edges, elem)?;
            intervals.push(knot_interval);
            Ok(index)
        } else {
            if !intervals.is_empty() {
                return Err(BuildError::InconsistentIntervals);
            }
            append(edges, elem)
        }
    }

    /// Append an explicit piece of `s_order` columns; `t_order` is inferred
    /// from the coefficient count
    pub fn add_explicit_piece(
        &mut self,
        s_order: usize,
        pt_index: u32,
        coeffs: &[f64],
    ) -> BuildResult<u32> {
        let (s, t) = explicit_orders(s_order, coeffs.len())?;
        let start = self.get_dictionary_index(coeffs)?;
        self.add_piece(Piece2D::explicit(s, t, start, pt_index))
    }

    /// Append a raw face layout without consulting the layout dictionary
    pub fn add_layout(&mut self, layout: FaceLayout) -> BuildResult<u32> {
        append(&mut self.parent.layouts, layout)
    }

    /// Append a hand-assembled piece
    ///
    /// Prefer [`IgaCreator::add_explicit_piece`] or
    /// [`IgaCreator::add_tensor_piece`], which also fill the dictionary.
    pub fn add_piece(&mut self, piece: Piece2D) -> BuildResult<u32> {
        append(&mut self.parent.pieces, piece)
    }

    pub fn add_point(&mut self, point: Point3d) -> BuildResult<u32> {
        append(&mut self.parent.points, point)
    }

    /// Append a tensor-product piece from its S and T coefficient runs
    pub fn add_tensor_piece(
        &mut self,
        s_coeffs: &[f64],
        t_coeffs: &[f64],
        pt_index: u32,
    ) -> BuildResult<u32> {
        let s = checked_order(s_coeffs.len())?;
        let t = checked_order(t_coeffs.len())?;
        if s_coeffs.iter().chain(t_coeffs).any(|c| !c.is_finite()) {
            return Err(BuildError::NonFiniteCoefficient);
        }

        // Both runs must fit before either lands in the dictionary
        let s_key = CoeffKey::new(s_coeffs);
        let t_key = CoeffKey::new(t_coeffs);
        let mut pending = 0;
        if !self.coeff_lookup.contains_key(&s_key) {
            pending += s_coeffs.len();
        }
        if !self.coeff_lookup.contains_key(&t_key) && t_key != s_key {
            pending += t_coeffs.len();
        }
        ensure_coeff_space(self.parent.coeffs.len(), pending)?;

        let s_start = self.get_dictionary_index(s_coeffs)?;
        let t_start = self.get_dictionary_index(t_coeffs)?;
        self.add_piece(Piece2D::tensor(s, t, s_start, t_start, pt_index))
    }

    /// Close the current element
    ///
    /// Every piece and edge added since the previous element belongs to this
    /// one. The layout must be stored (or be the implicit default at index 0)
    /// and declare exactly as many edges as were added.
    pub fn finish_elem(&mut self, layout_index: u32) -> BuildResult<u32> {
        let layout = match self.parent.layouts.get(layout_index as usize) {
            Some(layout) => *layout,
            None if layout_index == 0 => FaceLayout::DEFAULT,
            None => return Err(BuildError::LayoutOutOfRange { index: layout_index }),
        };

        let last_edge_end = self
            .parent
            .elems
            .last()
            .map_or(0, |elem| elem.edge_end_index as usize);
        let found = self.parent.edges.len() - last_edge_end;
        if found != layout.edge_count() as usize {
            return Err(BuildError::EdgeCountMismatch {
                found,
                expected: layout.edge_count(),
            });
        }

        let elem = Elem {
            piece_end_index: self.parent.piece_count(),
            layout_index,
            edge_end_index: self.parent.edge_count(),
        };
        append(&mut self.parent.elems, elem)
    }

    /// Dictionary start index for `coeffs`, appending them on first sight
    pub fn get_dictionary_index(&mut self, coeffs: &[f64]) -> BuildResult<u32> {
        // NaN would also break the exact-match lookup
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(BuildError::NonFiniteCoefficient);
        }

        let key = CoeffKey::new(coeffs);
        if let Some(&index) = self.coeff_lookup.get(&key) {
            log::trace!("coefficient dictionary hit at {index}");
            return Ok(index);
        }

        let index = self.add_coeffs(coeffs)?;
        self.coeff_lookup.insert(key, index);
        Ok(index)
    }

    /// Layout dictionary index for `layout`, appending it on first sight
    ///
    /// Layout 0 is always the default layout: if the first layout ever added
    /// is anything else, the default is stored ahead of it.
    pub fn get_layout_index(&mut self, layout: FaceLayout) -> BuildResult<u32> {
        if let Some(&index) = self.layout_lookup.get(&layout) {
            return Ok(index);
        }

        if self.parent.layouts.is_empty() && !layout.is_default() {
            let index = self.add_layout(FaceLayout::DEFAULT)?;
            self.layout_lookup.insert(FaceLayout::DEFAULT, index);
        }

        let index = self.add_layout(layout)?;
        self.layout_lookup.insert(layout, index);
        Ok(index)
    }

    /// Record the kind of surface being saved
    pub fn set_surface_type(&mut self, surface_type: impl Into<alloc::string::String>) {
        self.parent.surface_type = surface_type.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::INVALID_INDEX;
    use alloc::vec;

    #[test]
    fn test_new_clears_parent() {
        let mut data = IgaData::default();
        {
            let mut creator = IgaCreator::new(&mut data);
            creator.set_surface_type("bicubic");
            creator.add_point(Point3d::new(1.0, 2.0, 3.0, 1.0)).unwrap();
        }
        assert_eq!(data.point_count(), 1);

        let creator = IgaCreator::new(&mut data);
        assert_eq!(*creator.data(), IgaData::default());
    }

    #[test]
    fn test_dictionary_deduplicates() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);

        let a = creator.get_dictionary_index(&[1.0, 2.0, 3.0]).unwrap();
        let b = creator.get_dictionary_index(&[4.0, 5.0]).unwrap();
        let c = creator.get_dictionary_index(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!((a, b, c), (0, 3, 0));
        assert_eq!(creator.data().coeffs(), &[1.0, 2.0, 3.0, 4.0, 5.0]);

        // A prefix is a different vector
        let d = creator.get_dictionary_index(&[1.0, 2.0]).unwrap();
        assert_eq!(d, 5);
    }

    #[test]
    fn test_dictionary_signed_zero_matches() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        let a = creator.get_dictionary_index(&[0.0, 1.0]).unwrap();
        let b = creator.get_dictionary_index(&[-0.0, 1.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(creator.data().coeffs().len(), 2);
    }

    #[test]
    fn test_dictionary_rejects_non_finite() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        assert_eq!(
            creator.get_dictionary_index(&[1.0, f64::NAN]),
            Err(BuildError::NonFiniteCoefficient)
        );
        assert_eq!(
            creator.get_dictionary_index(&[f64::NEG_INFINITY]),
            Err(BuildError::NonFiniteCoefficient)
        );
        assert!(creator.data().coeffs().is_empty());
    }

    #[test]
    fn test_first_layout_forces_default() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);

        let t_junction = FaceLayout::new([0, 2, 3, 4, 5]);
        assert_eq!(creator.get_layout_index(t_junction), Ok(1));
        assert_eq!(creator.get_layout_index(FaceLayout::DEFAULT), Ok(0));
        assert_eq!(creator.get_layout_index(t_junction), Ok(1));
        assert_eq!(creator.data().layouts(), &[FaceLayout::DEFAULT, t_junction]);
        assert_eq!(*creator.data().layout(0), FaceLayout::DEFAULT);
    }

    #[test]
    fn test_default_layout_first_is_stored_once() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        assert_eq!(creator.get_layout_index(FaceLayout::DEFAULT), Ok(0));
        assert_eq!(creator.get_layout_index(FaceLayout::new([0, 1, 2, 3, 6])), Ok(1));
        assert_eq!(creator.data().layouts().len(), 2);
    }

    #[test]
    fn test_explicit_piece() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        let pt = creator.add_point(Point3d::new(0.0, 0.0, 0.0, 1.0)).unwrap();

        let coeffs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(creator.add_explicit_piece(3, pt, &coeffs), Ok(0));
        assert_eq!(creator.add_explicit_piece(2, pt, &coeffs), Ok(1));

        let data = creator.data();
        assert_eq!(data.coeffs().len(), 6);
        assert_eq!((data.piece_s_order(0), data.piece_t_order(0)), (3, 2));
        assert_eq!((data.piece_s_order(1), data.piece_t_order(1)), (2, 3));
        assert_eq!(data.piece_explicit_coeff(0, 2, 1), 6.0);
        assert_eq!(data.piece_t_index(0), INVALID_INDEX);
    }

    #[test]
    fn test_explicit_piece_rejections() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);

        assert_eq!(
            creator.add_explicit_piece(4, 0, &[1.0; 6]),
            Err(BuildError::OrderMismatch { s_order: 4, len: 6 })
        );
        assert_eq!(
            creator.add_explicit_piece(0, 0, &[]),
            Err(BuildError::OrderMismatch { s_order: 0, len: 0 })
        );
        assert_eq!(
            creator.add_explicit_piece(0x8000, 0, &vec![0.0; 0x8000]),
            Err(BuildError::OrderOutOfRange { order: 0x8000 })
        );
        // t_order is inferred as 0x8000
        assert_eq!(
            creator.add_explicit_piece(1, 0, &vec![0.0; 0x8000]),
            Err(BuildError::OrderOutOfRange { order: 0x8000 })
        );
        assert!(creator.data().pieces().is_empty());
        assert!(creator.data().coeffs().is_empty());
    }

    #[test]
    fn test_explicit_order_limits() {
        assert_eq!(explicit_orders(0x7FFF, 0x7FFF * 2), Ok((0x7FFF, 2)));
        assert_eq!(
            explicit_orders(0x7FFF, MAX_EXPLICIT_COEFFS + 1),
            Err(BuildError::TooManyCoefficients { len: MAX_EXPLICIT_COEFFS + 1 })
        );
        assert_eq!(
            explicit_orders(0x7FFF, MAX_EXPLICIT_COEFFS),
            Ok((0x7FFF, 0x7FFF))
        );
    }

    #[test]
    fn test_tensor_piece_shares_runs() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        let bernstein = [0.25, 0.5, 0.25];

        assert_eq!(creator.add_tensor_piece(&bernstein, &bernstein, 0), Ok(0));
        assert_eq!(creator.add_tensor_piece(&bernstein, &[1.0, 0.0], 0), Ok(1));

        let data = creator.data();
        assert_eq!(data.coeffs(), &[0.25, 0.5, 0.25, 1.0, 0.0]);
        assert_eq!((data.piece_s_index(0), data.piece_t_index(0)), (0, 0));
        assert_eq!(data.piece_t_coeffs(1), &[1.0, 0.0]);
        assert_eq!((data.piece_s_order(1), data.piece_t_order(1)), (3, 2));
    }

    #[test]
    fn test_tensor_piece_rejections() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        assert_eq!(
            creator.add_tensor_piece(&vec![0.0; 0x8000], &[1.0], 0),
            Err(BuildError::OrderOutOfRange { order: 0x8000 })
        );
        assert_eq!(
            creator.add_tensor_piece(&[1.0], &[f64::NAN], 0),
            Err(BuildError::NonFiniteCoefficient)
        );
        assert!(creator.data().coeffs().is_empty());
        assert!(creator.data().pieces().is_empty());
    }

    #[test]
    fn test_coeff_space_limit() {
        let top = (INVALID_INDEX - 1) as usize;
        assert_eq!(ensure_coeff_space(0, 16), Ok(()));
        assert_eq!(ensure_coeff_space(top - 8, 7), Ok(()));
        // S alone fits, S plus T does not
        assert_eq!(ensure_coeff_space(top - 8, 4 + 4), Err(BuildError::IndexOverflow));
        assert_eq!(ensure_coeff_space(top, 0), Err(BuildError::IndexOverflow));
        assert_eq!(ensure_coeff_space(usize::MAX, 1), Err(BuildError::IndexOverflow));
    }

    #[test]
    fn test_tensor_piece_counts_only_new_runs() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        creator.get_dictionary_index(&[0.25, 0.75]).unwrap();

        // Same run for S and T is stored once
        creator.add_tensor_piece(&[0.5, 0.5], &[0.5, 0.5], 0).unwrap();
        assert_eq!(creator.data().coeffs(), &[0.25, 0.75, 0.5, 0.5]);

        creator.add_tensor_piece(&[0.25, 0.75], &[1.0], 0).unwrap();
        assert_eq!(creator.data().coeffs(), &[0.25, 0.75, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_interval_discipline() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        assert_eq!(creator.add_edge(INVALID_INDEX, -1.0), Ok(0));
        assert_eq!(
            creator.add_edge(INVALID_INDEX, 0.5),
            Err(BuildError::InconsistentIntervals)
        );
        assert_eq!(creator.data().edges().len(), 1);

        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        assert_eq!(creator.add_edge(INVALID_INDEX, 0.0), Ok(0));
        assert_eq!(creator.add_edge(3, 2.0), Ok(1));
        assert_eq!(
            creator.add_edge(3, -1.0),
            Err(BuildError::InconsistentIntervals)
        );
        assert_eq!(creator.add_edge(3, f64::NAN), Err(BuildError::NonFiniteInterval));
        assert_eq!(
            creator.add_edge(3, f64::INFINITY),
            Err(BuildError::NonFiniteInterval)
        );
        assert_eq!(creator.data().edges(), &[INVALID_INDEX, 3]);
        assert_eq!(creator.data().intervals(), &[0.0, 2.0]);
    }

    #[test]
    fn test_finish_elem_checks_layout() {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        for _ in 0..3 {
            creator.add_edge(INVALID_INDEX, -1.0).unwrap();
        }
        assert_eq!(
            creator.finish_elem(0),
            Err(BuildError::EdgeCountMismatch { found: 3, expected: 4 })
        );
        assert_eq!(
            creator.finish_elem(1),
            Err(BuildError::LayoutOutOfRange { index: 1 })
        );
        creator.add_edge(INVALID_INDEX, -1.0).unwrap();
        assert_eq!(creator.finish_elem(0), Ok(0));

        // The next element starts counting from the previous end
        assert_eq!(
            creator.finish_elem(0),
            Err(BuildError::EdgeCountMismatch { found: 0, expected: 4 })
        );
        assert_eq!(creator.data().elem_count(), 1);
    }

    #[test]
    fn test_single_element_scenario() {
        let mut data = IgaData::default();
        {
            let mut creator = IgaCreator::new(&mut data);
            let pt = creator.add_point(Point3d::new(0.0, 0.0, 0.0, 1.0)).unwrap();
            assert_eq!(creator.add_explicit_piece(1, pt, &[2.5]), Ok(0));
            for _ in 0..4 {
                creator.add_edge(INVALID_INDEX, -1.0).unwrap();
            }
            assert_eq!(creator.finish_elem(0), Ok(0));
        }
        assert!(data.is_valid());
        assert!(data.layouts().is_empty());
        assert!(data.intervals().is_empty());
        assert_eq!(data.coeffs(), &[2.5]);
    }

    #[test]
    fn test_two_elements_with_t_junction() {
        let mut data = IgaData::default();
        {
            let mut creator = IgaCreator::new(&mut data);
            creator.set_surface_type("T-spline");
            let pt = creator.add_point(Point3d::new(0.0, 0.0, 0.0, 1.0)).unwrap();

            creator.add_tensor_piece(&[1.0], &[1.0], pt).unwrap();
            for other in [INVALID_INDEX, 1, INVALID_INDEX, INVALID_INDEX] {
                creator.add_edge(other, 1.0).unwrap();
            }
            let uniform = creator.get_layout_index(FaceLayout::DEFAULT).unwrap();
            creator.finish_elem(uniform).unwrap();

            creator.add_tensor_piece(&[1.0], &[1.0], pt).unwrap();
            for other in [INVALID_INDEX, INVALID_INDEX, INVALID_INDEX, 0, INVALID_INDEX] {
                creator.add_edge(other, 0.5).unwrap();
            }
            let split_left = creator
                .get_layout_index(FaceLayout::new([0, 1, 2, 3, 5]))
                .unwrap();
            assert_eq!(creator.finish_elem(split_left), Ok(1));
        }
        assert_eq!(data.validate(), Ok(()));
        assert_eq!(data.surface_type(), "T-spline");
        assert_eq!(data.coeffs(), &[1.0]);
        assert_eq!(data.edge_range(1), 4..9);
    }
}
