//! Decoding a TSS block stream into an [`IgaData`]
//!
//! The reader fills the model's arrays directly, one block at a time. Blocks
//! with unknown tags are skipped, so newer files stay readable. A successful
//! decode only means the stream was well framed; call
//! [`IgaData::validate`] before trusting the indices.

use alloc::string::String;
use alloc::vec::Vec;
use bytemuck::Pod;
use core::mem::size_of;

use crate::config::ReadConfig;
use crate::error::{IgaError, Result};
use crate::format::tag::TAG_IGAFILE;
use crate::format::{BlockHeader, BlockKind, MAGIC};
use crate::model::IgaData;
use crate::validation::{element_count, within_alloc_limit};

/// A forward-only byte source for container decoding
///
/// Implementors supply [`IgaReader::read_data`]; the decoding protocol is
/// provided.
pub trait IgaReader {
    /// Fill `dst` completely, or fail with [`IgaError::Stream`]
    fn read_data(&mut self, dst: &mut [u8]) -> Result<()>;

    /// Called once after a container has been decoded successfully
    fn read_finished(&mut self) {}

    /// Decode a container into `data` with the default [`ReadConfig`]
    fn read_iga_file(&mut self, data: &mut IgaData) -> Result<()> {
        read_container(self, data, &ReadConfig::default())
    }

    /// Decode a container into `data`
    ///
    /// `data` is cleared first. On error it holds whatever was decoded
    /// before the failure.
    fn read_iga_file_with(&mut self, data: &mut IgaData, config: &ReadConfig) -> Result<()> {
        read_container(self, data, config)
    }
}

/// In-memory byte source over a borrowed buffer
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }
}

impl IgaReader for SliceReader<'_> {
    fn read_data(&mut self, dst: &mut [u8]) -> Result<()> {
        let end = self
            .position
            .checked_add(dst.len())
            .ok_or(IgaError::Stream)?;
        let src = self.bytes.get(self.position..end).ok_or(IgaError::Stream)?;
        dst.copy_from_slice(src);
        self.position = end;
        Ok(())
    }
}

fn read_header<R: IgaReader + ?Sized>(reader: &mut R) -> Result<BlockHeader> {
    let mut bytes = [0u8; BlockHeader::SIZE];
    reader.read_data(&mut bytes)?;
    Ok(BlockHeader::from_bytes(&bytes))
}

fn read_u64<R: IgaReader + ?Sized>(reader: &mut R) -> Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_data(&mut bytes)?;
    Ok(u64::from_ne_bytes(bytes))
}

/// Read one block payload into `dst`, replacing its contents
///
/// The size checks run before anything is allocated.
fn read_block<R, T>(
    reader: &mut R,
    header: &BlockHeader,
    config: &ReadConfig,
    dst: &mut Vec<T>,
) -> Result<()>
where
    R: IgaReader + ?Sized,
    T: Pod,
{
    let len = header.block_len;
    if !within_alloc_limit(len, config.max_alloc) {
        return Err(IgaError::AllocationLimit {
            len,
            max: config.max_alloc,
        });
    }

    let elem_size = size_of::<T>();
    let count = element_count(len, elem_size).ok_or(IgaError::MisalignedBlock {
        tag: header.tag,
        len,
        elem_size,
    })?;

    dst.clear();
    dst.try_reserve_exact(count)
        .map_err(|_| IgaError::AllocationLimit {
            len,
            max: config.max_alloc,
        })?;
    dst.resize(count, T::zeroed());
    reader.read_data(bytemuck::cast_slice_mut(dst.as_mut_slice()))?;

    let trailing = read_u64(reader)?;
    if trailing != len {
        return Err(IgaError::LengthMismatch {
            declared: len,
            trailing,
        });
    }
    Ok(())
}

fn decode_label(bytes: &[u8]) -> String {
    match core::str::from_utf8(bytes) {
        Ok(label) => String::from(label),
        Err(_) => {
            log::warn!("surface type label is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn read_container<R: IgaReader + ?Sized>(
    reader: &mut R,
    data: &mut IgaData,
    config: &ReadConfig,
) -> Result<()> {
    data.clear();

    let mut magic = [0u8; 8];
    reader.read_data(&mut magic)?;
    if magic != MAGIC {
        return Err(IgaError::BadMagic);
    }

    let file_marker = read_header(reader)?;
    if !file_marker.has_marker() || file_marker.tag != TAG_IGAFILE {
        return Err(IgaError::BadFileMarker);
    }
    let mut scratch: Vec<u8> = Vec::new();
    read_block(reader, &file_marker, config, &mut scratch)?;

    // A header that cannot be read in full marks the end of the stream
    while let Ok(header) = read_header(reader) {
        if !header.has_marker() {
            return Err(IgaError::BadBlockMarker);
        }
        log::trace!(
            "block tag={:#018x} id={} len={}",
            header.tag,
            header.id,
            header.block_len
        );

        let Some(kind) = BlockKind::from_tag(header.tag) else {
            log::debug!(
                "skipping unknown block {:#018x} ({} bytes)",
                header.tag,
                header.block_len
            );
            read_block(reader, &header, config, &mut scratch)?;
            continue;
        };

        log::debug!("reading {kind} block ({} bytes)", header.block_len);
        match kind {
            BlockKind::SurfaceType => {
                read_block(reader, &header, config, &mut scratch)?;
                // A surface type starts a new surface
                data.clear();
                data.surface_type = decode_label(&scratch);
            }
            BlockKind::Coeffs => read_block(reader, &header, config, &mut data.coeffs)?,
            BlockKind::Points => read_block(reader, &header, config, &mut data.points)?,
            BlockKind::Pieces => read_block(reader, &header, config, &mut data.pieces)?,
            BlockKind::Layouts => read_block(reader, &header, config, &mut data.layouts)?,
            BlockKind::Edges => read_block(reader, &header, config, &mut data.edges)?,
            BlockKind::Intervals => read_block(reader, &header, config, &mut data.intervals)?,
            BlockKind::Elems => read_block(reader, &header, config, &mut data.elems)?,
        }
    }

    reader.read_finished();
    Ok(())
}
