//! `std::io` adapters for the container protocols
//!
//! The core protocols only see success or [`IgaError::Stream`]. The adapters
//! keep the most recent `io::Error` so callers can report the real cause.

use igafile_core::{IgaError, IgaReader, IgaWriter};
use std::io::{self, Read, Write};

/// Decodes containers from any [`Read`]
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    last_error: Option<io::Error>,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            last_error: None,
        }
    }

    /// The most recent read failure, if any
    ///
    /// A normal end of stream also leaves an `UnexpectedEof` here.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.last_error.take()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> IgaReader for StreamReader<R> {
    fn read_data(&mut self, dst: &mut [u8]) -> igafile_core::Result<()> {
        self.inner.read_exact(dst).map_err(|err| {
            self.last_error = Some(err);
            IgaError::Stream
        })
    }

    fn read_finished(&mut self) {
        tracing::trace!("container read finished");
    }
}

/// Encodes containers into any [`Write`]; flushes when a container is complete
#[derive(Debug)]
pub struct StreamWriter<W> {
    inner: W,
    last_error: Option<io::Error>,
    bytes_written: u64,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            last_error: None,
            bytes_written: 0,
        }
    }

    /// Total bytes handed to the inner writer
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// The most recent write or flush failure, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.last_error.take()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn record(&mut self, result: io::Result<()>) -> igafile_core::Result<()> {
        result.map_err(|err| {
            self.last_error = Some(err);
            IgaError::Stream
        })
    }
}

impl<W: Write> IgaWriter for StreamWriter<W> {
    fn write_data(&mut self, data: &[u8]) -> igafile_core::Result<()> {
        let result = self.inner.write_all(data);
        self.record(result)?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    fn write_finished(&mut self) -> igafile_core::Result<()> {
        let result = self.inner.flush();
        self.record(result)
    }
}
