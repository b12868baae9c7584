use std::io;

use bytes::Bytes;

use super::BodyStream;

/// In-memory, seekable body.
#[derive(Debug, Clone, Default)]
pub struct MemoryBody {
    data: Bytes,
    position: usize,
}

impl MemoryBody {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl BodyStream for MemoryBody {
    fn is_seekable(&self) -> bool {
        true
    }

    fn eof(&self) -> bool {
        self.position >= self.data.len()
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.position = 0;
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> io::Result<Bytes> {
        let start = self.position.min(self.data.len());
        let end = start.saturating_add(max_len).min(self.data.len());
        self.position = end;

        Ok(self.data.slice(start..end))
    }
}

impl From<Bytes> for MemoryBody {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for MemoryBody {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<String> for MemoryBody {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&'static str> for MemoryBody {
    fn from(data: &'static str) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_slices_until_eof() {
        let mut body = MemoryBody::from("test content");
        assert!(body.is_seekable());
        assert_eq!(body.size(), Some(12));

        assert_eq!(&body.read(5).unwrap()[..], b"test ");
        assert_eq!(&body.read(100).unwrap()[..], b"content");
        assert!(body.eof());
        assert!(body.read(100).unwrap().is_empty());

        body.rewind().unwrap();
        assert!(!body.eof());
        assert_eq!(body.position(), 0);
    }

    #[test]
    fn empty_body_starts_at_eof() {
        let mut body = MemoryBody::default();
        assert!(body.eof());
        assert!(body.read(1).unwrap().is_empty());
    }
}
