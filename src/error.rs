//! # Error Types
//!
//! Every failure in the template pipeline is fatal, so the library exposes a single
//! error enum. Configuration problems (bad files, bad values, page sizes that cannot
//! make progress) are kept apart from filesystem problems so the binary can report
//! which side of the run went wrong.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration or writing templates.
#[derive(Error, Debug)]
pub enum FretError {
    /// Config file content could not be parsed or is structurally wrong
    #[error("config error: {0}")]
    Config(String),

    /// A single field holds a value the geometry cannot work with
    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Reading the config or writing an output page failed
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FretError>;

impl FretError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FretError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        FretError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for every configuration-side failure.
    pub fn is_config(&self) -> bool {
        matches!(self, FretError::Config(_) | FretError::InvalidField { .. })
    }

    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FretError::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }
}
