use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to read response body: {0}")]
    Body(#[source] io::Error),
    #[error("output channel failed: {0}")]
    Channel(#[source] io::Error),
}
