use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tokio::{
    fs::OpenOptions,
    io::{self, AsyncWrite},
};

use super::{BufferedManager, DrainHandle, RecordWriter};

pub const fn default_buffer_size() -> usize {
    1000
}

pub const fn default_forward_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Snafu)]
pub enum BuildError {
    #[snafu(display("Could not open analytics output {:?}: {}", path, source))]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where delivered records are written.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
    /// Appends to a file, creating it if needed.
    File { path: PathBuf },
}

/// Configuration for the `delivery` table.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// The number of batches that may wait for the output.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// How long a stream waits for the buffer to accept a batch.
    #[serde(default = "default_forward_timeout_secs")]
    pub forward_timeout_secs: u64,

    #[serde(default)]
    pub target: Target,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            forward_timeout_secs: default_forward_timeout_secs(),
            target: Target::default(),
        }
    }
}

impl DeliveryConfig {
    pub const fn forward_timeout(&self) -> Duration {
        Duration::from_secs(self.forward_timeout_secs)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.buffer_size == 0 {
            errors.push("delivery.buffer_size must be greater than zero".to_owned());
        }
        if self.forward_timeout_secs == 0 {
            errors.push("delivery.forward_timeout_secs must be greater than zero".to_owned());
        }
        errors
    }

    /// Opens the output and spawns the buffered manager draining into it.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn build(&self) -> Result<(BufferedManager, DrainHandle), BuildError> {
        let output: Box<dyn AsyncWrite + Send + Unpin> = match &self.target {
            Target::Stdout => Box::new(io::stdout()),
            Target::Stderr => Box::new(io::stderr()),
            Target::File { path } => Box::new(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await
                    .context(OpenFileSnafu { path: path.clone() })?,
            ),
        };

        Ok(BufferedManager::new(
            self.buffer_size.max(1),
            RecordWriter::new(output),
        ))
    }
}
