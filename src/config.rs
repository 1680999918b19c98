//! Settings for one run.
//!
//! Defaults can be overridden by a JSON settings file, which command-line
//! flags override in turn:
//!
//! ```json
//! { "title_case": false, "root_type": "Payload", "go_formatter": "gofmt -s" }
//! ```
use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::ident::Case;

/// The knobs the inference core itself reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub case: Case,
    pub normalize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { case: Case::Title, normalize: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Treat `-` and `_` as word boundaries and title-case identifiers.
    pub title_case: bool,
    /// Squash arrays of struct and resolve primitive array types.
    pub normalize: bool,
    /// Name of the top-level declaration.
    pub root_type: String,
    /// Command the Go declaration is piped through with `--pretty`.
    pub go_formatter: String,
    /// Command the Rust declaration is piped through with `--pretty`.
    pub rust_formatter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title_case: true,
            normalize: true,
            root_type: crate::codegen::DEFAULT_ROOT.to_string(),
            go_formatter: "gofmt".to_string(),
            rust_formatter: "rustfmt --edition 2021 --emit stdout".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io("read settings", path, e))?;
        let settings = Self::from_slice(&bytes)
            .map_err(|message| Error::Config { path: path.to_path_buf(), message })?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        crate::path_de::from_slice_with_path(bytes)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn options(&self) -> Options {
        Options {
            case: Case::from_title_flag(self.title_case),
            normalize: self.normalize,
        }
    }
}
