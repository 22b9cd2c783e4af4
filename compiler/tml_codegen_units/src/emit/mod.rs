//! Writing object bytes to disk.
//!
//! Units are compiled on several threads at once, so temp file names
//! combine the writing thread's id with a process-wide counter.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::BackendError;

static OBJECT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Error type for object emission and the object cache.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("codegen failed for '{unit}': {source}")]
    Backend {
        unit: String,
        #[source]
        source: BackendError,
    },

    #[error("failed to write object file '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("failed to create directory '{}': {message}", path.display())]
    CreateDir { path: PathBuf, message: String },

    #[error("failed to update object cache manifest '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

/// Write `bytes` to `<tmp>/<stem>_<thread>_<counter>.o`.
pub fn write_object_to_temp(bytes: &[u8], stem: &str) -> Result<PathBuf, EmitError> {
    write_object_to_dir(&std::env::temp_dir(), bytes, stem)
}

/// Like [`write_object_to_temp`], into `dir`.
pub fn write_object_to_dir(dir: &Path, bytes: &[u8], stem: &str) -> Result<PathBuf, EmitError> {
    let counter = OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!("{}_{}_{counter}.o", file_stem(stem), thread_tag());
    let path = dir.join(name);
    std::fs::write(&path, bytes).map_err(|e| EmitError::Write {
        path: path.clone(),
        message: e.to_string(),
    })?;
    tracing::trace!(path = %path.display(), bytes = bytes.len(), "wrote object file");
    Ok(path)
}

/// Digits of the current `ThreadId`; its `Debug` form is `ThreadId(N)`.
fn thread_tag() -> String {
    format!("{:?}", std::thread::current().id())
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// Module names contain `::` and dots; keep file names portable.
pub(crate) fn file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
