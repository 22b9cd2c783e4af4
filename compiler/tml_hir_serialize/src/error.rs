//! Serializer and cache errors.

use std::path::PathBuf;

/// Why a binary HIR buffer could not be (fully) decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HirReadError {
    #[error("Invalid HIR file magic number")]
    InvalidMagic,

    #[error("Incompatible HIR version: {major}.{minor}")]
    IncompatibleVersion { major: u16, minor: u16 },

    #[error("Unexpected end of HIR data while reading {what}")]
    Truncated { what: &'static str },

    #[error("Unknown {kind} tag {tag}")]
    UnknownTag { kind: &'static str, tag: u8 },

    #[error("Invalid UTF-8 in HIR string")]
    InvalidUtf8,

    #[error("Invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: u64 },

    #[error("HIR nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    #[error("text HIR reading is not implemented")]
    TextUnsupported,
}

/// Failures of the file helpers and the cache sidecar.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to read '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("'{}' is not a HIR cache info file", path.display())]
    InvalidInfo { path: PathBuf },

    #[error("'{}' holds invalid HIR: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: HirReadError,
    },
}

impl CacheError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        CacheError::Read {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        CacheError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
