use std::io::{self, ErrorKind, Read};

use bytes::Bytes;

mod memory;
mod reader;
mod seekable;

pub use memory::MemoryBody;
pub use reader::ReaderBody;
pub use seekable::SeekableBody;

/// Sequential byte source backing a response body.
///
/// Streams come in two flavours, told apart by [`is_seekable`]: seekable
/// streams may be rewound to the start and are safe to probe ahead of
/// emission, forward-only streams lose whatever is read from them.
/// [`rewind`] must only be called when [`is_seekable`] is true.
///
/// [`is_seekable`]: BodyStream::is_seekable
/// [`rewind`]: BodyStream::rewind
pub trait BodyStream {
    fn is_seekable(&self) -> bool;

    /// Whether the end of data has been reached.
    fn eof(&self) -> bool;

    /// Total size in bytes, if known.
    fn size(&self) -> Option<u64>;

    /// Moves the read position back to the first byte.
    fn rewind(&mut self) -> io::Result<()>;

    /// Reads up to `max_len` bytes. An empty result means the stream is
    /// exhausted.
    fn read(&mut self, max_len: usize) -> io::Result<Bytes>;
}

impl<B: BodyStream + ?Sized> BodyStream for Box<B> {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn eof(&self) -> bool {
        (**self).eof()
    }

    fn size(&self) -> Option<u64> {
        (**self).size()
    }

    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }

    fn read(&mut self, max_len: usize) -> io::Result<Bytes> {
        (**self).read(max_len)
    }
}

impl<B: BodyStream + ?Sized> BodyStream for &mut B {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn eof(&self) -> bool {
        (**self).eof()
    }

    fn size(&self) -> Option<u64> {
        (**self).size()
    }

    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }

    fn read(&mut self, max_len: usize) -> io::Result<Bytes> {
        (**self).read(max_len)
    }
}

/// Performs a single read of at most `max_len` bytes, retrying on
/// interruption.
fn read_chunk<R: Read + ?Sized>(reader: &mut R, max_len: usize) -> io::Result<Bytes> {
    let mut buf = vec![0; max_len];
    let n = loop {
        match reader.read(&mut buf) {
            Ok(n) => break n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    };

    buf.truncate(n);
    Ok(Bytes::from(buf))
}

fn not_seekable() -> io::Error {
    io::Error::new(ErrorKind::Unsupported, "body stream is not seekable")
}
