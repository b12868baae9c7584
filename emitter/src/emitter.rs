use std::num::NonZeroUsize;

use http::{
    header::{CONTENT_LENGTH, SET_COOKIE},
    StatusCode,
};

use crate::{body::BodyStream, channel::OutputChannel, http::Response, EmitError};

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

const DEFAULT_CHUNK: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CHUNK_SIZE) {
    Some(size) => size,
    None => panic!("chunk size must be positive"),
};

/// Status codes that never carry a message body.
const BODILESS_STATUSES: [StatusCode; 3] = [
    StatusCode::NO_CONTENT,
    StatusCode::RESET_CONTENT,
    StatusCode::NOT_MODIFIED,
];

/// Whether responses with `status` must never carry a message body.
pub fn forbids_body(status: StatusCode) -> bool {
    BODILESS_STATUSES.contains(&status)
}

/// Sends a [`Response`] through an [`OutputChannel`].
///
/// Bodies are streamed at most `chunk_size` bytes at a time. Disconnects,
/// short bodies and heads that were already sent end the emission early
/// without an error.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    chunk_size: NonZeroUsize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK)
    }
}

impl Emitter {
    pub const fn new(chunk_size: NonZeroUsize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Emits `response` onto `channel`.
    ///
    /// Channels may hold the head back until body bytes arrive; a response
    /// without a body is only complete once the channel is finished (see
    /// [`WireChannel::finish`](crate::WireChannel::finish)).
    #[tracing::instrument(skip_all, fields(status = response.status().as_u16()))]
    pub fn emit<B, C>(&self, response: &mut Response<B>, channel: &mut C) -> Result<(), EmitError>
    where
        B: BodyStream,
        C: OutputChannel,
    {
        let is_empty = self.is_response_empty(response)?;

        if channel.headers_sent() {
            tracing::debug!("headers already sent, skipping head");
        } else {
            emit_headers(response, channel)?;
            emit_status_line(response, channel)?;
        }

        if is_empty {
            return Ok(());
        }

        self.emit_body(response, channel)
    }

    /// Whether `response` must go out without a body.
    ///
    /// Seekable bodies are probed by reading one byte from the start and are
    /// rewound again afterwards. Forward-only bodies are never read; their
    /// end-of-data flag decides.
    pub fn is_response_empty<B: BodyStream>(
        &self,
        response: &mut Response<B>,
    ) -> Result<bool, EmitError> {
        if forbids_body(response.status()) {
            return Ok(true);
        }

        let body = response.body_mut();
        if !body.is_seekable() {
            return Ok(body.eof());
        }

        body.rewind().map_err(EmitError::Body)?;
        let probe = body.read(1).map_err(EmitError::Body)?;
        body.rewind().map_err(EmitError::Body)?;

        Ok(probe.is_empty())
    }

    fn emit_body<B, C>(&self, response: &mut Response<B>, channel: &mut C) -> Result<(), EmitError>
    where
        B: BodyStream,
        C: OutputChannel,
    {
        let length = transfer_length(response);
        let body = response.body_mut();

        if body.is_seekable() {
            body.rewind().map_err(EmitError::Body)?;
        }

        match length {
            Some(length) => self.emit_body_with_length(body, channel, length),
            None => self.emit_body_without_length(body, channel),
        }
    }

    fn emit_body_with_length<B, C>(
        &self,
        body: &mut B,
        channel: &mut C,
        mut remaining: u64,
    ) -> Result<(), EmitError>
    where
        B: BodyStream,
        C: OutputChannel,
    {
        while remaining > 0 && !body.eof() {
            let len = usize::try_from(remaining)
                .map_or(self.chunk_size(), |remaining| remaining.min(self.chunk_size()));

            let data = body.read(len).map_err(EmitError::Body)?;
            if data.is_empty() {
                tracing::debug!(remaining, "body ended before the announced length");
                break;
            }

            channel.write_body(&data).map_err(EmitError::Channel)?;
            remaining = remaining.saturating_sub(data.len() as u64);
            tracing::trace!(len = data.len(), remaining, "wrote body chunk");

            if !connected(channel) {
                break;
            }
        }

        Ok(())
    }

    fn emit_body_without_length<B, C>(&self, body: &mut B, channel: &mut C) -> Result<(), EmitError>
    where
        B: BodyStream,
        C: OutputChannel,
    {
        while !body.eof() {
            let data = body.read(self.chunk_size()).map_err(EmitError::Body)?;
            if data.is_empty() {
                break;
            }

            channel.write_body(&data).map_err(EmitError::Channel)?;
            tracing::trace!(len = data.len(), "wrote body chunk");

            if !connected(channel) {
                break;
            }
        }

        Ok(())
    }
}

fn emit_headers<B, C: OutputChannel>(response: &Response<B>, channel: &mut C) -> Result<(), EmitError> {
    for (name, values) in response.headers().iter() {
        let is_set_cookie = name.eq_ignore_ascii_case(SET_COOKIE.as_str());

        for (index, value) in values.iter().enumerate() {
            let line = format!("{name}: {value}");
            let replace = index == 0 && !is_set_cookie;
            channel
                .header(&line, replace, None)
                .map_err(EmitError::Channel)?;
        }
    }

    Ok(())
}

fn emit_status_line<B, C: OutputChannel>(
    response: &Response<B>,
    channel: &mut C,
) -> Result<(), EmitError> {
    let status = response.status();
    let line = format!(
        "HTTP/{} {} {}",
        response.version(),
        status.as_str(),
        response.reason_phrase()
    );

    channel
        .header(&line, true, Some(status))
        .map_err(EmitError::Channel)
}

/// Number of body bytes to send, if it can be told up front.
///
/// `Content-Length` wins over the stream size, except that a zero value
/// defers to the stream. A value that is not a number leaves the length
/// unknown.
fn transfer_length<B: BodyStream>(response: &Response<B>) -> Option<u64> {
    let declared = response
        .headers()
        .get(CONTENT_LENGTH.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "0");

    let length = match declared {
        Some(value) => value.parse::<u64>().ok()?,
        None => response.body().size()?,
    };

    (length > 0).then_some(length)
}

fn connected<C: OutputChannel>(channel: &C) -> bool {
    let status = channel.connection_status();
    if !status.is_normal() {
        tracing::debug!(?status, "connection lost, abandoning body");
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use crate::body::{MemoryBody, ReaderBody};

    use super::*;

    #[test]
    fn content_length_wins_over_size() {
        let response = Response::new(MemoryBody::from("abcdef")).with_header("content-length", "3");
        assert_eq!(transfer_length(&response), Some(3));
    }

    #[test]
    fn zero_content_length_falls_back_to_size() {
        let response = Response::new(MemoryBody::from("abcdef")).with_header("Content-Length", "0");
        assert_eq!(transfer_length(&response), Some(6));

        let response = Response::new(MemoryBody::default()).with_header("Content-Length", "0");
        assert_eq!(transfer_length(&response), None);
    }

    #[test]
    fn garbage_content_length_is_unknown() {
        let response = Response::new(MemoryBody::from("abcdef")).with_header("Content-Length", "-5");
        assert_eq!(transfer_length(&response), None);

        let response = Response::new(MemoryBody::from("abcdef")).with_header("Content-Length", "ten");
        assert_eq!(transfer_length(&response), None);
    }

    #[test]
    fn unknown_size_is_unknown_length() {
        let response = Response::new(ReaderBody::new(&b"abc"[..]));
        assert_eq!(transfer_length(&response), None);

        let response = Response::new(ReaderBody::new(&b"abc"[..]).with_size(3));
        assert_eq!(transfer_length(&response), Some(3));
    }

    #[test]
    fn bodiless_statuses() {
        assert!(forbids_body(StatusCode::NO_CONTENT));
        assert!(forbids_body(StatusCode::RESET_CONTENT));
        assert!(forbids_body(StatusCode::NOT_MODIFIED));
        assert!(!forbids_body(StatusCode::OK));
        assert!(!forbids_body(StatusCode::NOT_FOUND));
    }

    #[test]
    fn default_chunk_size() {
        assert_eq!(Emitter::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }
}
