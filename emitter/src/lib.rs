//! Writes an already-built HTTP/1.x response onto a live output channel.
//!
//! The [`Emitter`] decides whether the response may carry a body, forwards
//! the header set and status line to an [`OutputChannel`] and streams the
//! [`BodyStream`] in bounded chunks, giving up quietly once the peer goes
//! away.

pub mod body;
pub mod channel;
mod emitter;
mod error;
pub mod http;

pub use body::{BodyStream, MemoryBody, ReaderBody, SeekableBody};
pub use channel::{ConnectionStatus, OutputChannel, WireChannel};
pub use self::emitter::{forbids_body, Emitter, DEFAULT_CHUNK_SIZE};
pub use error::EmitError;
pub use self::http::{HeaderFields, IntoResponse, Json, Response};
