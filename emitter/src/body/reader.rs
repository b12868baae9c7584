use std::io::{self, Read};

use bytes::Bytes;

use super::{not_seekable, read_chunk, BodyStream};

/// Forward-only body over any reader, such as a pipe or stdin.
///
/// The end of data is only known once a read comes back empty, so a fresh
/// `ReaderBody` never reports [`eof`](BodyStream::eof).
#[derive(Debug)]
pub struct ReaderBody<R> {
    inner: R,
    size: Option<u64>,
    eof: bool,
}

impl<R: Read> ReaderBody<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            size: None,
            eof: false,
        }
    }

    /// Declares the number of bytes the reader is expected to yield.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> BodyStream for ReaderBody<R> {
    fn is_seekable(&self) -> bool {
        false
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn rewind(&mut self) -> io::Result<()> {
        Err(not_seekable())
    }

    fn read(&mut self, max_len: usize) -> io::Result<Bytes> {
        if self.eof {
            return Ok(Bytes::new());
        }

        let chunk = read_chunk(&mut self.inner, max_len)?;
        if chunk.is_empty() && max_len > 0 {
            self.eof = true;
        }

        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn eof_after_empty_read() {
        let mut body = ReaderBody::new(&b"abc"[..]);
        assert!(!body.is_seekable());
        assert!(!body.eof());
        assert_eq!(body.size(), None);

        assert_eq!(&body.read(10).unwrap()[..], b"abc");
        assert!(!body.eof());
        assert!(body.read(10).unwrap().is_empty());
        assert!(body.eof());
    }

    #[test]
    fn refuses_to_rewind() {
        let mut body = ReaderBody::new(&b""[..]).with_size(0);
        assert_eq!(body.size(), Some(0));
        assert_eq!(body.rewind().unwrap_err().kind(), ErrorKind::Unsupported);
    }
}
