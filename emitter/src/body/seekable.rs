use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use bytes::Bytes;

use super::{read_chunk, BodyStream};

/// Seekable body over a file or any other `Read + Seek` source.
#[derive(Debug)]
pub struct SeekableBody<R> {
    inner: R,
    size: u64,
    position: u64,
    exhausted: bool,
}

impl SeekableBody<File> {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> SeekableBody<R> {
    /// Wraps `inner`, measuring its size and positioning it at the start.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        Ok(Self {
            inner,
            size,
            position: 0,
            exhausted: false,
        })
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> BodyStream for SeekableBody<R> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn eof(&self) -> bool {
        self.exhausted || self.position >= self.size
    }

    fn size(&self) -> Option<u64> {
        Some(self.size)
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.position = 0;
        self.exhausted = false;
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> io::Result<Bytes> {
        let chunk = read_chunk(&mut self.inner, max_len)?;
        if chunk.is_empty() && max_len > 0 {
            self.exhausted = true;
        }
        self.position += chunk.len() as u64;

        Ok(chunk)
    }
}
