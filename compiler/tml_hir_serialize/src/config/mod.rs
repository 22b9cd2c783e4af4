//! Serializer options and cache directory layout.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tml_hir::HirModule;
use tracing::debug;

use crate::cache_info::{info_path_for, write_hir_cache_info, HirCacheInfo, HirDependency};
use crate::error::CacheError;
use crate::files::{is_hir_cache_valid, read_hir_file, write_hir_file};
use crate::hash::{compute_hir_hash, compute_source_hash};

/// Options shared by the binary and text writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HirSerializeOptions {
    /// Write source spans into binary output. Off saves six `u32`s per node.
    pub include_spans: bool,
    /// Indent nested text output and separate declarations with blank lines.
    pub pretty: bool,
}

impl Default for HirSerializeOptions {
    fn default() -> Self {
        Self {
            include_spans: true,
            pretty: true,
        }
    }
}

impl HirSerializeOptions {
    #[must_use]
    pub fn with_spans(mut self, include_spans: bool) -> Self {
        self.include_spans = include_spans;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Where and how HIR cache entries are stored.
///
/// A module named `app` is cached as `<cache_dir>/app.thir`, with its
/// metadata sidecar next to it as `<cache_dir>/app.thir.info`.
#[derive(Debug, Clone)]
pub struct HirCacheConfig {
    pub cache_dir: PathBuf,
    pub extension: String,
    pub options: HirSerializeOptions,
}

impl HirCacheConfig {
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            extension: "thir".to_string(),
            options: HirSerializeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_spans(mut self, include_spans: bool) -> Self {
        self.options.include_spans = include_spans;
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn hir_path(&self, module_name: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", sanitize(module_name), self.extension))
    }

    pub fn info_path(&self, module_name: &str) -> PathBuf {
        info_path_for(&self.hir_path(module_name))
    }

    /// Writes `module` and its sidecar. Returns the path of the HIR file.
    pub fn store(
        &self,
        module: &HirModule,
        source_path: &Path,
        deps: Vec<HirDependency>,
    ) -> Result<PathBuf, CacheError> {
        std::fs::create_dir_all(&self.cache_dir)
            .map_err(|e| CacheError::write(&self.cache_dir, &e))?;

        let hir_path = self.hir_path(&module.name);
        write_hir_file(module, &hir_path, true, self.options)?;

        let info = HirCacheInfo {
            module_name: module.name.clone(),
            source_path: source_path.to_string_lossy().into_owned(),
            source_hash: compute_source_hash(source_path),
            hir_hash: compute_hir_hash(module),
            compile_timestamp: unix_seconds(),
            deps,
        };
        write_hir_cache_info(&info, &info_path_for(&hir_path))?;

        debug!(
            module = %module.name,
            path = %hir_path.display(),
            hir_hash = %info.hir_hash,
            "stored HIR cache entry"
        );
        Ok(hir_path)
    }

    /// Loads the cached module if its source and dependencies are unchanged.
    pub fn load_if_valid(
        &self,
        module_name: &str,
        source_path: &Path,
    ) -> Result<Option<HirModule>, CacheError> {
        let hir_path = self.hir_path(module_name);
        let source_hash = compute_source_hash(source_path);
        if !is_hir_cache_valid(&hir_path, source_hash) {
            return Ok(None);
        }
        read_hir_file(&hir_path).map(Some)
    }
}

/// Module names may contain `::`; keep file names flat.
fn sanitize(module_name: &str) -> String {
    module_name.replace("::", ".").replace(['/', '\\'], "_")
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests;
