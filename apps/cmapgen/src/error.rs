//! Error type shared by catalog loading, sampling, and emission.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal failures. Any of these aborts a generation run.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested colormap is not defined by the catalog.
    #[error("unknown colormap '{name}'")]
    UnknownColormap { name: String },

    /// Generated symbol is not a valid C++ identifier.
    #[error("colormap '{name}' maps to invalid symbol '{symbol}'")]
    InvalidSymbol { name: String, symbol: String },

    /// Two colormaps map to the same symbol.
    #[error("colormaps '{first}' and '{second}' both map to symbol '{symbol}'")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },

    /// Catalog file could not be read or parsed.
    #[error("catalog {}: {message}", path.display())]
    Catalog { path: PathBuf, message: String },

    /// Color value is neither `#RRGGBB` nor an in-range float triple.
    #[error("colormap '{name}': invalid color {value}")]
    InvalidColor { name: String, value: String },

    /// Colormap definition is inconsistent (stop positions, kind).
    #[error("colormap '{name}': {message}")]
    InvalidDefinition { name: String, message: String },

    /// Colormap definition has no colors.
    #[error("colormap '{name}' has no colors")]
    EmptyColormap { name: String },

    /// Configuration value rejected.
    #[error("config: {message}")]
    Config { message: String },

    /// Filesystem failure.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
