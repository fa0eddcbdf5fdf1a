//! Encoding an [`IgaData`] as a TSS block stream

use alloc::vec::Vec;

use crate::error::Result;
use crate::format::tag::{tag_value, TAG_IGAFILE};
use crate::format::{BlockHeader, BlockKind, MAGIC};
use crate::model::IgaData;

/// A byte sink for container encoding
///
/// Implementors supply [`IgaWriter::write_data`]. Override
/// [`IgaWriter::write_block`] to change how structured blocks are framed;
/// the magic and file marker are always written through `write_data`.
pub trait IgaWriter {
    /// Write all of `data`, or fail with [`crate::IgaError::Stream`]
    fn write_data(&mut self, data: &[u8]) -> Result<()>;

    /// Write one framed block: header, payload, then the length again
    fn write_block(&mut self, block_type: &str, contents: &[u8], id: u64) -> Result<()> {
        write_framed(self, tag_value(block_type), id, contents)
    }

    /// Called once after the last block has been written
    fn write_finished(&mut self) -> Result<()> {
        Ok(())
    }

    /// Encode `data` as a complete container
    fn write_iga_file(&mut self, data: &IgaData) -> Result<()> {
        write_container(self, data)
    }
}

impl IgaWriter for Vec<u8> {
    fn write_data(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

fn write_framed<W: IgaWriter + ?Sized>(
    writer: &mut W,
    tag: u64,
    id: u64,
    contents: &[u8],
) -> Result<()> {
    let len = contents.len() as u64;
    writer.write_data(BlockHeader::new(tag, id, len).as_bytes())?;
    writer.write_data(contents)?;
    writer.write_data(&len.to_ne_bytes())
}

/// Payload bytes of one structured block
fn block_contents(data: &IgaData, kind: BlockKind) -> &[u8] {
    match kind {
        BlockKind::SurfaceType => data.surface_type.as_bytes(),
        BlockKind::Coeffs => bytemuck::cast_slice(&data.coeffs),
        BlockKind::Points => bytemuck::cast_slice(&data.points),
        BlockKind::Pieces => bytemuck::cast_slice(&data.pieces),
        BlockKind::Layouts => bytemuck::cast_slice(&data.layouts),
        BlockKind::Edges => bytemuck::cast_slice(&data.edges),
        BlockKind::Intervals => bytemuck::cast_slice(&data.intervals),
        BlockKind::Elems => bytemuck::cast_slice(&data.elems),
    }
}

fn write_container<W: IgaWriter + ?Sized>(writer: &mut W, data: &IgaData) -> Result<()> {
    writer.write_data(&MAGIC)?;
    write_framed(writer, TAG_IGAFILE, 0, &[])?;

    for kind in BlockKind::ALL {
        let contents = block_contents(data, kind);
        // Absent intervals mean every edge is uniform
        if kind == BlockKind::Intervals && contents.is_empty() {
            continue;
        }
        log::trace!("writing {kind} block ({} bytes)", contents.len());
        writer.write_block(kind.mnemonic(), contents, 0)?;
    }

    writer.write_finished()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::INVALID_INDEX;
    use crate::format::tag::tag_text;
    use crate::reader::{IgaReader, SliceReader};
    use crate::{IgaCreator, IgaError, Point3d};
    use alloc::string::String;

    fn single_element(knot_interval: f64) -> IgaData {
        let mut data = IgaData::default();
        let mut creator = IgaCreator::new(&mut data);
        let pt = creator.add_point(Point3d::new(0.0, 0.0, 0.0, 1.0)).unwrap();
        creator.add_explicit_piece(1, pt, &[2.5]).unwrap();
        for _ in 0..4 {
            creator.add_edge(INVALID_INDEX, knot_interval).unwrap();
        }
        creator.finish_elem(0).unwrap();
        data
    }

    /// Records the mnemonic of every block passed to `write_block`
    #[derive(Default)]
    struct BlockLog {
        bytes: Vec<u8>,
        blocks: Vec<String>,
        finished: bool,
    }

    impl IgaWriter for BlockLog {
        fn write_data(&mut self, data: &[u8]) -> Result<()> {
            self.bytes.write_data(data)
        }

        fn write_block(&mut self, block_type: &str, contents: &[u8], id: u64) -> Result<()> {
            self.blocks.push(String::from(block_type));
            self.bytes.write_block(block_type, contents, id)
        }

        fn write_finished(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn test_file_prefix() {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.write_iga_file(&IgaData::default()).unwrap();

        assert_eq!(&bytes[..8], b"#TSS0001");
        let marker = BlockHeader::from_bytes(bytes[8..40].try_into().unwrap());
        assert!(marker.has_marker());
        assert_eq!(tag_text(marker.tag), *b"IGAFILE\n");
        assert_eq!((marker.id, marker.block_len), (0, 0));
        assert_eq!(&bytes[40..48], &0u64.to_ne_bytes());
    }

    #[test]
    fn test_block_order_without_intervals() {
        let mut sink = BlockLog::default();
        sink.write_iga_file(&single_element(-1.0)).unwrap();
        assert_eq!(
            sink.blocks,
            ["SRFTYPE", "VECDICT", "PT3DW", "2DPIECE", "LAYOUT", "EDGES", "SHAPE"]
        );
        assert!(sink.finished);
    }

    #[test]
    fn test_block_order_with_intervals() {
        let mut sink = BlockLog::default();
        sink.write_iga_file(&single_element(1.0)).unwrap();
        assert_eq!(
            sink.blocks,
            ["SRFTYPE", "VECDICT", "PT3DW", "2DPIECE", "LAYOUT", "EDGES", "KNOTINT", "SHAPE"]
        );
    }

    #[test]
    fn test_payload_framing() {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.write_block("VECDICT", bytemuck::cast_slice(&[2.5f64]), 3).unwrap();
        assert_eq!(bytes.len(), BlockHeader::SIZE + 8 + 8);

        let header = BlockHeader::from_bytes(bytes[..32].try_into().unwrap());
        assert_eq!(header.tag, BlockKind::Coeffs.tag());
        assert_eq!((header.id, header.block_len), (3, 8));
        assert_eq!(&bytes[32..40], &2.5f64.to_ne_bytes());
        assert_eq!(&bytes[40..], &8u64.to_ne_bytes());
    }

    #[test]
    fn test_single_element_roundtrip() {
        let data = single_element(-1.0);
        assert!(data.is_valid());

        let mut bytes: Vec<u8> = Vec::new();
        bytes.write_iga_file(&data).unwrap();
        let mut decoded = IgaData::default();
        SliceReader::new(&bytes).read_iga_file(&mut decoded).unwrap();

        assert_eq!(decoded.coeffs(), &[2.5]);
        assert_eq!(decoded.point_count(), 1);
        assert_eq!(decoded.piece_count(), 1);
        assert_eq!(decoded.edge_count(), 4);
        assert_eq!(decoded.elem_count(), 1);
        assert!(decoded.layouts().is_empty());
        assert!(decoded.intervals().is_empty());
        assert_eq!(decoded.edge_interval(2), 1.0);
        assert!(decoded.is_valid());
    }

    #[test]
    fn test_sink_failure_propagates() {
        struct Full(usize);
        impl IgaWriter for Full {
            fn write_data(&mut self, data: &[u8]) -> Result<()> {
                self.0 = self.0.checked_sub(data.len()).ok_or(IgaError::Stream)?;
                Ok(())
            }
        }

        let data = single_element(0.5);
        let mut bytes: Vec<u8> = Vec::new();
        bytes.write_iga_file(&data).unwrap();

        assert_eq!(Full(bytes.len()).write_iga_file(&data), Ok(()));
        assert_eq!(
            Full(bytes.len() - 1).write_iga_file(&data),
            Err(IgaError::Stream)
        );
        assert_eq!(Full(0).write_iga_file(&data), Err(IgaError::Stream));
    }
}
