//! Error types for jsongen.
//!
//! Inference and rendering are total; everything that can fail sits at the
//! edges: reading input, decoding it, loading settings, pre-selecting a
//! sub-document, and piping the output through an external formatter.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to decode JSON input: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("JSON pointer `{0}` does not select anything in the input")]
    Pointer(String),

    #[error("jq filter failed: {0}")]
    Jq(String),

    #[error("jq filter produced {count} values; expected exactly one document")]
    JqArity { count: usize },

    /// The formatter rejected the generated source. `unformatted` is the
    /// renderer's own output, still usable as-is.
    #[error("formatter `{command}` failed: {message}")]
    Format {
        command: String,
        message: String,
        unformatted: String,
    },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { action, path: path.into(), source }
    }

    /// Source text that is still worth emitting despite the error.
    pub fn fallback_output(&self) -> Option<&str> {
        match self {
            Error::Format { unformatted, .. } => Some(unformatted),
            _ => None,
        }
    }
}
