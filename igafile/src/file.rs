//! Loading and saving IGA files on disk

use crate::error::{Error, Result};
use crate::stream::{StreamReader, StreamWriter};
use igafile_core::{IgaData, IgaReader, IgaWriter, ReadConfig};
use std::{
    fs::File,
    io::{BufWriter, ErrorKind, Read},
    path::{Path, PathBuf},
};

/// A decoded IGA file and where it came from
#[derive(Debug, Clone)]
pub struct IgaFile {
    pub path: PathBuf,
    pub data: IgaData,
}

impl IgaFile {
    /// Open and decode an existing file
    ///
    /// The file is memory-mapped when the `mmap` feature is enabled and read
    /// through a buffer otherwise. Only the framing is checked; see
    /// [`IgaFile::load_valid`].
    pub fn open<P: AsRef<Path>>(path: P, config: &ReadConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        let mut data = IgaData::new();
        decode_file(&file, &mut data, config)?;

        tracing::info!(
            path = %path.display(),
            surface_type = data.surface_type(),
            elems = data.elem_count(),
            pieces = data.piece_count(),
            "loaded IGA file"
        );
        Ok(Self { path, data })
    }

    /// Open a file and reject it unless the model passes validation
    pub fn load_valid<P: AsRef<Path>>(path: P, config: &ReadConfig) -> Result<Self> {
        let file = Self::open(path, config)?;
        file.data.validate()?;
        Ok(file)
    }

    /// Decode a container from any reader
    pub fn read_from<R: Read>(reader: R, config: &ReadConfig) -> Result<IgaData> {
        let mut data = IgaData::new();
        decode_stream(reader, &mut data, config)?;
        Ok(data)
    }

    /// Encode `data` into a new file at `path`, returning the bytes written
    pub fn save<P: AsRef<Path>>(path: P, data: &IgaData) -> Result<u64> {
        let path = path.as_ref();
        let file = File::create(path)?;

        let mut writer = StreamWriter::new(BufWriter::new(file));
        writer
            .write_iga_file(data)
            .map_err(|err| Error::from_stream(err, writer.take_error()))?;

        let bytes = writer.bytes_written();
        tracing::info!(path = %path.display(), bytes, "saved IGA file");
        Ok(bytes)
    }

    pub fn into_data(self) -> IgaData {
        self.data
    }
}

#[cfg(feature = "mmap")]
fn decode_file(file: &File, data: &mut IgaData, config: &ReadConfig) -> Result<()> {
    use igafile_core::SliceReader;
    use memmap2::Mmap;

    // SAFETY: read-only mapping that does not outlive this call
    let mmap = unsafe { Mmap::map(file)? };
    tracing::debug!(len = mmap.len(), "mapped IGA file");
    SliceReader::new(&mmap).read_iga_file_with(data, config)?;
    Ok(())
}

#[cfg(not(feature = "mmap"))]
fn decode_file(file: &File, data: &mut IgaData, config: &ReadConfig) -> Result<()> {
    decode_stream(std::io::BufReader::new(file), data, config)
}

/// Decode through a [`StreamReader`], surfacing any real I/O failure
///
/// The core ends a container at the first header it cannot read, so a read
/// error there still decodes successfully. Only an end of stream may do that.
fn decode_stream<R: Read>(reader: R, data: &mut IgaData, config: &ReadConfig) -> Result<()> {
    let mut reader = StreamReader::new(reader);
    let result = reader.read_iga_file_with(data, config);
    let io = reader.take_error();
    match (result, io) {
        (Err(err), io) => Err(Error::from_stream(err, io)),
        (Ok(()), Some(io)) if io.kind() != ErrorKind::UnexpectedEof => Err(Error::Io(io)),
        (Ok(()), _) => Ok(()),
    }
}
