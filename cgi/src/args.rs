use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use http::StatusCode;
use mime::Mime;

/// Writes a file (or stdin) to stdout as an HTTP/1.x response.
#[derive(Debug, Parser)]
#[command(name = "emit", version)]
pub struct Args {
    /// Body source; stdin when omitted or `-`
    pub path: Option<PathBuf>,

    #[arg(short, long, default_value_t = 200)]
    pub status: u16,

    /// Reason phrase; defaults to the canonical one for the status
    #[arg(short, long)]
    pub reason: Option<String>,

    #[arg(long, default_value = "1.1")]
    pub http_version: String,

    /// Extra header as `Name: value`, may be repeated
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(short = 't', long, default_value_t = mime::APPLICATION_OCTET_STREAM)]
    pub content_type: Mime,

    /// Do not add a Content-Length header for bodies of known size
    #[arg(long)]
    pub no_content_length: bool,

    /// Overrides `chunk_size` from the config file
    #[arg(long)]
    pub chunk_size: Option<usize>,

    #[arg(short, long, default_value = "emit.toml")]
    pub config: PathBuf,
}

impl Args {
    pub fn status(&self) -> anyhow::Result<StatusCode> {
        StatusCode::from_u16(self.status)
            .with_context(|| format!("invalid status code {}", self.status))
    }
}

fn parse_header(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got {arg:?}"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header {arg:?} has an empty name"));
    }

    Ok((name.to_string(), value.trim_start().to_string()))
}
