use std::io;

use http::StatusCode;

mod wire;

pub use wire::WireChannel;

/// Liveness of the peer on the other side of an [`OutputChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Normal,
    Aborted,
    TimedOut,
}

impl ConnectionStatus {
    pub fn is_normal(self) -> bool {
        self == ConnectionStatus::Normal
    }
}

/// Transport a response is written to.
///
/// Implementations may buffer header lines until body bytes arrive, so a
/// caller owns flushing the head of bodiless responses once emission is
/// done.
pub trait OutputChannel {
    /// Whether the response head has already gone out.
    fn headers_sent(&self) -> bool;

    /// Queues one header or status line.
    ///
    /// With `replace` set, the line supersedes earlier lines of the same
    /// header name; otherwise it is added next to them. `status`, when
    /// given, is the response status code carried alongside the line.
    fn header(&mut self, line: &str, replace: bool, status: Option<StatusCode>) -> io::Result<()>;

    /// Writes raw body bytes.
    fn write_body(&mut self, data: &[u8]) -> io::Result<()>;

    fn connection_status(&self) -> ConnectionStatus;
}

impl<C: OutputChannel + ?Sized> OutputChannel for &mut C {
    fn headers_sent(&self) -> bool {
        (**self).headers_sent()
    }

    fn header(&mut self, line: &str, replace: bool, status: Option<StatusCode>) -> io::Result<()> {
        (**self).header(line, replace, status)
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_body(data)
    }

    fn connection_status(&self) -> ConnectionStatus {
        (**self).connection_status()
    }
}
