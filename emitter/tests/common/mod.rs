//! Fakes standing in for a real transport and body source.

use std::{cell::RefCell, collections::VecDeque, io};

use bytes::Bytes;
use emitter::{BodyStream, ConnectionStatus, OutputChannel};
use http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCall {
    pub line: String,
    pub replace: bool,
    pub status: Option<StatusCode>,
}

/// Records every call made to it.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub headers_sent: bool,
    pub headers: Vec<HeaderCall>,
    pub writes: Vec<Vec<u8>>,
    /// The connection is reported as aborted once this many body writes
    /// went through.
    pub abort_after: Option<usize>,
    pub status: ConnectionStatus,
}

#[allow(dead_code)]
impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers_sent(mut self) -> Self {
        self.headers_sent = true;
        self
    }

    pub fn aborting_after(mut self, writes: usize) -> Self {
        self.abort_after = Some(writes);
        self
    }

    pub fn body(&self) -> Vec<u8> {
        self.writes.concat()
    }

    pub fn segment_sizes(&self) -> Vec<usize> {
        self.writes.iter().map(Vec::len).collect()
    }
}

impl OutputChannel for RecordingChannel {
    fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    fn header(&mut self, line: &str, replace: bool, status: Option<StatusCode>) -> io::Result<()> {
        self.headers.push(HeaderCall {
            line: line.to_string(),
            replace,
            status,
        });
        Ok(())
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        self.writes.push(data.to_vec());
        if self.abort_after == Some(self.writes.len()) {
            self.status = ConnectionStatus::Aborted;
        }
        Ok(())
    }

    fn connection_status(&self) -> ConnectionStatus {
        self.status
    }
}

/// Body stream answering reads and end-of-data queries from a script.
///
/// Once the eof script runs out, the stream reports eof when no scripted
/// reads are left.
#[derive(Debug, Default)]
pub struct ScriptedBody {
    pub seekable: bool,
    pub size: Option<u64>,
    reads: VecDeque<&'static [u8]>,
    eofs: RefCell<VecDeque<bool>>,
    pub read_calls: usize,
    pub rewinds: usize,
}

#[allow(dead_code)]
impl ScriptedBody {
    pub fn seekable(reads: &[&'static [u8]]) -> Self {
        Self {
            seekable: true,
            reads: reads.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn forward_only(reads: &[&'static [u8]]) -> Self {
        Self {
            seekable: false,
            reads: reads.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_eofs(self, eofs: &[bool]) -> Self {
        *self.eofs.borrow_mut() = eofs.iter().copied().collect();
        self
    }
}

impl BodyStream for ScriptedBody {
    fn is_seekable(&self) -> bool {
        self.seekable
    }

    fn eof(&self) -> bool {
        self.eofs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.reads.is_empty())
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn rewind(&mut self) -> io::Result<()> {
        assert!(self.seekable, "rewind called on a forward-only body");
        self.rewinds += 1;
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> io::Result<Bytes> {
        self.read_calls += 1;
        let chunk = self.reads.pop_front().unwrap_or_default();
        assert!(chunk.len() <= max_len, "script returned more than asked for");
        Ok(Bytes::from_static(chunk))
    }
}
