mod args;
mod config;

use std::{
    fs::File,
    io::{self, BufWriter, Read, Seek},
    num::NonZeroUsize,
    process,
};

use anyhow::Context;
use clap::Parser;
use emitter::{
    forbids_body, BodyStream, Emitter, HeaderFields, OutputChannel, ReaderBody, Response,
    SeekableBody, WireChannel,
};
use tracing_subscriber::EnvFilter;

use self::{args::Args, config::Config};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        tracing::error!(err = %format!("{err:#}"), "emit failed");
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let chunk_size = args.chunk_size.unwrap_or(config.chunk_size);
    let chunk_size = NonZeroUsize::new(chunk_size).context("chunk size must be positive")?;

    let body: Box<dyn BodyStream> = match &args.path {
        Some(path) if path.as_os_str() != "-" => File::open(path)
            .and_then(body_from_file)
            .with_context(|| format!("failed to open {}", path.display()))?,
        _ => Box::new(ReaderBody::new(io::stdin().lock())),
    };

    let mut response = build_response(&args, &config, body)?;

    tracing::debug!(
        status = %response.status(),
        headers = ?response.headers(),
        chunk_size,
        "emitting response"
    );

    let stdout = io::stdout().lock();
    let mut channel = WireChannel::new(BufWriter::with_capacity(chunk_size.get(), stdout));
    Emitter::new(chunk_size).emit(&mut response, &mut channel)?;

    let status = channel.connection_status();
    channel.finish().context("failed to flush stdout")?;
    if !status.is_normal() {
        tracing::warn!(?status, "reader went away before the body was complete");
    }

    Ok(())
}

/// Seekable sources are measured up front; pipes, FIFOs and process
/// substitutions cannot seek and are streamed forward-only instead.
fn body_from_file<R>(mut source: R) -> io::Result<Box<dyn BodyStream>>
where
    R: Read + Seek + 'static,
{
    if let Err(err) = source.stream_position() {
        tracing::debug!(%err, "body source cannot seek, streaming it as is");
        return Ok(Box::new(ReaderBody::new(source)));
    }

    Ok(Box::new(SeekableBody::new(source)?))
}

/// Assembles the response head: configured defaults first, `-H` headers
/// replacing defaults of the same name, then `Content-Type` and
/// `Content-Length` unless already present or the status forbids a body.
fn build_response<B: BodyStream>(
    args: &Args,
    config: &Config,
    body: B,
) -> anyhow::Result<Response<B>> {
    let status = args.status()?;
    let mut response = Response::new(body)
        .with_status(status)
        .with_version(args.http_version.as_str());
    if let Some(reason) = &args.reason {
        response = response.with_reason(reason.as_str());
    }

    let overrides: HeaderFields = args
        .headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let headers = response.headers_mut();
    for header in &config.default_headers {
        if !overrides.contains(&header.name) {
            headers.append(header.name.as_str(), header.value.as_str());
        }
    }
    for (name, values) in overrides.iter() {
        for value in values {
            headers.append(name, value.as_str());
        }
    }

    if forbids_body(status) {
        return Ok(response);
    }

    if !response.headers().contains("Content-Type") {
        response
            .headers_mut()
            .append("Content-Type", args.content_type.to_string());
    }

    if !args.no_content_length && !response.headers().contains("Content-Length") {
        if let Some(size) = response.body().size() {
            response.headers_mut().append("Content-Length", size.to_string());
        }
    }

    Ok(response)
}
