//! Human-readable dumps and summaries of a model

use igafile_core::{IgaData, Side};
use std::io::{self, Write};

/// Write a verbose, line-per-entity description of `data`
///
/// Each element lists its edges per side, its edges with their neighbours
/// and intervals, and its pieces with their coefficients. Explicit
/// coefficients are printed one row per T, highest T first.
pub fn write_report<W: Write>(data: &IgaData, mut out: W) -> io::Result<()> {
    writeln!(out, "Surface type is {}", data.surface_type())?;

    for elem in 0..data.elem_count() {
        let sides = Side::ALL.map(|side| data.elem_edges_on_side(elem, side));
        writeln!(
            out,
            "Elem {elem} has {} edges ({}, {}, {}, {}) and covers pieces {}..{}.",
            data.elem_edge_count(elem),
            sides[0],
            sides[1],
            sides[2],
            sides[3],
            data.piece_begin(elem),
            data.piece_end(elem),
        )?;

        for edge in data.edge_range(elem) {
            let interval = data.edge_interval(edge);
            if data.edge_is_boundary(edge) {
                writeln!(out, "  Edge {edge} is on the boundary and has interval {interval}")?;
            } else {
                writeln!(
                    out,
                    "  Edge {edge} is adjacent to Elem {} and has interval {interval}",
                    data.edge_other(edge)
                )?;
            }
        }

        for piece in data.piece_range(elem) {
            write_piece(data, piece, &mut out)?;
        }
    }
    Ok(())
}

fn write_piece<W: Write>(data: &IgaData, piece: u32, out: &mut W) -> io::Result<()> {
    let s_order = data.piece_s_order(piece);
    let t_order = data.piece_t_order(piece);
    let pt = data.piece_point(piece);
    let kind = if data.piece_is_tensor(piece) {
        "tensor product"
    } else {
        "explicit"
    };
    writeln!(
        out,
        "  Piece {piece} is {kind}, order {s_order}x{t_order}, geometry ({},{},{}/{}) and has coeffs:",
        pt.x, pt.y, pt.z, pt.w
    )?;

    if data.piece_is_tensor(piece) {
        write!(out, "    S:")?;
        for c in data.piece_s_coeffs(piece) {
            write!(out, " {c}")?;
        }
        writeln!(out)?;
        write!(out, "    T:")?;
        for c in data.piece_t_coeffs(piece) {
            write!(out, " {c}")?;
        }
        writeln!(out)?;
    } else {
        let coeffs = data.piece_explicit_coeffs(piece);
        for row in coeffs.chunks(s_order.max(1)).rev() {
            write!(out, "    ")?;
            for c in row {
                write!(out, "{c} ")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Entity counts for a model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IgaSummary {
    pub surface_type: String,
    pub elems: u32,
    pub pieces: u32,
    pub explicit_pieces: u32,
    pub tensor_pieces: u32,
    pub points: u32,
    pub coeffs: usize,
    pub edges: u32,
    pub boundary_edges: u32,
    pub layouts: usize,
    pub has_intervals: bool,
}

impl IgaSummary {
    pub fn of(data: &IgaData) -> Self {
        let explicit_pieces = data.pieces().iter().filter(|p| p.is_explicit()).count() as u32;
        let boundary_edges = (0..data.edge_count())
            .filter(|&edge| data.edge_is_boundary(edge))
            .count() as u32;

        Self {
            surface_type: data.surface_type().to_owned(),
            elems: data.elem_count(),
            pieces: data.piece_count(),
            explicit_pieces,
            tensor_pieces: data.piece_count() - explicit_pieces,
            points: data.point_count(),
            coeffs: data.coeffs().len(),
            edges: data.edge_count(),
            boundary_edges,
            layouts: data.layouts().len(),
            has_intervals: !data.intervals().is_empty(),
        }
    }

    /// Pretty-printed JSON form of the summary
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igafile_core::{FaceLayout, IgaCreator, Point3d, INVALID_INDEX};

    fn two_elements() -> IgaData {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        creator.set_surface_type("T-spline");
        let pt = creator.add_point(Point3d::new(1.0, 2.0, 0.5, 1.0)).unwrap();

        creator
            .add_explicit_piece(2, pt, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        for other in [INVALID_INDEX, 1, INVALID_INDEX, INVALID_INDEX] {
            creator.add_edge(other, 1.0).unwrap();
        }
        let uniform = creator.get_layout_index(FaceLayout::DEFAULT).unwrap();
        creator.finish_elem(uniform).unwrap();

        creator.add_tensor_piece(&[0.5, 0.5], &[1.0], pt).unwrap();
        for other in [INVALID_INDEX, INVALID_INDEX, INVALID_INDEX, 0, INVALID_INDEX] {
            creator.add_edge(other, 0.5).unwrap();
        }
        let split = creator
            .get_layout_index(FaceLayout::new([0, 1, 2, 3, 5]))
            .unwrap();
        creator.finish_elem(split).unwrap();
        data
    }

    #[test]
    fn test_report_text() {
        let mut out: Vec<u8> = Vec::new();
        write_report(&two_elements(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Surface type is T-spline");
        assert_eq!(lines[1], "Elem 0 has 4 edges (1, 1, 1, 1) and covers pieces 0..1.");
        assert_eq!(lines[2], "  Edge 0 is on the boundary and has interval 1");
        assert_eq!(lines[3], "  Edge 1 is adjacent to Elem 1 and has interval 1");
        assert_eq!(
            lines[6],
            "  Piece 0 is explicit, order 2x3, geometry (1,2,0.5/1) and has coeffs:"
        );
        // Highest T row first
        assert_eq!(lines[7], "    5 6 ");
        assert_eq!(lines[9], "    1 2 ");
        assert_eq!(lines[10], "Elem 1 has 5 edges (1, 1, 1, 2) and covers pieces 1..2.");
        assert_eq!(lines[14], "  Edge 7 is adjacent to Elem 0 and has interval 0.5");
        assert_eq!(
            lines[16],
            "  Piece 1 is tensor product, order 2x1, geometry (1,2,0.5/1) and has coeffs:"
        );
        assert_eq!(lines[17], "    S: 0.5 0.5");
        assert_eq!(lines[18], "    T: 1");
        assert_eq!(lines.len(), 19);
    }

    #[test]
    fn test_summary_counts() {
        let summary = IgaSummary::of(&two_elements());
        assert_eq!(
            summary,
            IgaSummary {
                surface_type: "T-spline".to_owned(),
                elems: 2,
                pieces: 2,
                explicit_pieces: 1,
                tensor_pieces: 1,
                points: 1,
                coeffs: 9,
                edges: 9,
                boundary_edges: 7,
                layouts: 2,
                has_intervals: true,
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_summary_json() {
        let json = IgaSummary::of(&IgaData::default()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["surface_type"], "unknown");
        assert_eq!(value["elems"], 0);
        assert_eq!(value["has_intervals"], false);
    }
}
