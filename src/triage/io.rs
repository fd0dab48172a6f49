//! Bounded I/O utilities for safe file reading.
//!
//! The classification engine only ever sees bytes; this module is how the
//! command line gets them without reading unbounded input.

use crate::error::{Result, UnmaskError};
use crate::triage::config::IOConfig;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Resource limits for I/O operations.
#[derive(Debug, Clone)]
pub struct IOLimits {
    pub max_read_bytes: u64,
    pub max_file_size: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        IOConfig::default().into()
    }
}

impl From<IOConfig> for IOLimits {
    fn from(cfg: IOConfig) -> Self {
        Self {
            max_read_bytes: cfg.max_read_bytes,
            max_file_size: cfg.max_file_size,
        }
    }
}

/// A bounded reader that limits the amount of data read.
pub struct BoundedReader<R> {
    inner: R,
    bytes_read: u64,
    limit: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(reader: R, limit: u64) -> Self {
        Self {
            inner: reader,
            bytes_read: 0,
            limit,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.bytes_read >= self.limit {
            return Ok(0); // EOF
        }

        let remaining = self.limit - self.bytes_read;
        let max_to_read = std::cmp::min(buf.len() as u64, remaining) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// File reader that refuses oversized files and caps every read.
pub struct SafeFileReader {
    file: File,
    size: u64,
    limits: IOLimits,
}

impl SafeFileReader {
    /// Open a file with safety limits.
    pub fn open<P: AsRef<Path>>(path: P, limits: IOLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        debug!(
            path = %path.display(),
            size,
            max_file = limits.max_file_size,
            max_read = limits.max_read_bytes,
            "Opened file"
        );

        if size > limits.max_file_size {
            warn!(size, limit = limits.max_file_size, "File too large");
            return Err(UnmaskError::ResourceExhausted {
                resource: "file size".into(),
                used: size,
                limit: limits.max_file_size,
            });
        }

        Ok(Self { file, size, limits })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read up to `size` leading bytes, never more than `max_read_bytes`.
    ///
    /// Short reads from the OS are retried until the bound or EOF.
    pub fn read_prefix(&mut self, size: u64) -> Result<Vec<u8>> {
        let read_size = std::cmp::min(size, self.limits.max_read_bytes);
        let mut reader = BoundedReader::new(&mut self.file, read_size);
        let mut data = Vec::with_capacity(read_size.min(self.size) as usize);
        reader.read_to_end(&mut data)?;
        Ok(data)
    }
}
