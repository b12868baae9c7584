use std::path::Path;

use config::{Environment, File, FileFormat};

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub default_headers: Vec<ConfigHeader>,
}

impl Config {
    /// Loads `path` if it exists, then lets `EMIT_*` environment variables
    /// override it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let path = path.to_string_lossy();
        let config: Self = ::config::Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("EMIT").try_parsing(true))
            .build()?
            .try_deserialize()?;

        anyhow::ensure!(config.chunk_size > 0, "chunk_size must be positive");
        Ok(config)
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ConfigHeader {
    pub name: String,
    pub value: String,
}

fn default_chunk_size() -> usize {
    emitter::DEFAULT_CHUNK_SIZE
}
