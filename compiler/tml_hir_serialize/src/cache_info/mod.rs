//! The `.info` sidecar describing a cached HIR file.
//!
//! ```text
//! u32 magic "HIRI"
//! str module_name | str source_path
//! u64 source_hash | u64 hir_hash | u64 compile_timestamp
//! u32 dep_count, then per dep: str name | str path | u64 hash
//! ```
//!
//! Strings are a `u32` length followed by UTF-8 bytes, all little-endian.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CacheError;
use crate::hash::{compute_source_hash, ContentHash};

/// "HIRI" in little-endian byte order.
pub const CACHE_INFO_MAGIC: u32 = 0x4952_4948;

/// A module the cached HIR was built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HirDependency {
    pub module_name: String,
    pub source_path: String,
    pub content_hash: ContentHash,
}

impl HirDependency {
    /// Records `source_path` with its current source hash.
    pub fn from_source(module_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        let source_path = source_path.into();
        let content_hash = compute_source_hash(Path::new(&source_path));
        HirDependency {
            module_name: module_name.into(),
            source_path,
            content_hash,
        }
    }
}

/// Everything needed to decide whether a cache entry is still valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HirCacheInfo {
    pub module_name: String,
    pub source_path: String,
    pub source_hash: ContentHash,
    pub hir_hash: ContentHash,
    /// Seconds since the Unix epoch.
    pub compile_timestamp: u64,
    pub deps: Vec<HirDependency>,
}

impl HirCacheInfo {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&CACHE_INFO_MAGIC.to_le_bytes());
        put_str(&mut out, &self.module_name);
        put_str(&mut out, &self.source_path);
        out.extend_from_slice(&self.source_hash.value().to_le_bytes());
        out.extend_from_slice(&self.hir_hash.value().to_le_bytes());
        out.extend_from_slice(&self.compile_timestamp.to_le_bytes());
        put_len(&mut out, self.deps.len());
        for dep in &self.deps {
            put_str(&mut out, &dep.module_name);
            put_str(&mut out, &dep.source_path);
            out.extend_from_slice(&dep.content_hash.value().to_le_bytes());
        }
        out
    }

    /// `None` on a wrong magic number, truncation or invalid UTF-8.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let mut cursor = Cursor { bytes, pos: 0 };
        if cursor.u32()? != CACHE_INFO_MAGIC {
            return None;
        }
        let module_name = cursor.string()?;
        let source_path = cursor.string()?;
        let source_hash = ContentHash::new(cursor.u64()?);
        let hir_hash = ContentHash::new(cursor.u64()?);
        let compile_timestamp = cursor.u64()?;
        let count = cursor.u32()? as usize;
        let mut deps = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            deps.push(HirDependency {
                module_name: cursor.string()?,
                source_path: cursor.string()?,
                content_hash: ContentHash::new(cursor.u64()?),
            });
        }
        Some(HirCacheInfo {
            module_name,
            source_path,
            source_hash,
            hir_hash,
            compile_timestamp,
            deps,
        })
    }
}

fn put_len(out: &mut Vec<u8>, len: usize) {
    // Lengths past u32::MAX are clamped.
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_le_bytes());
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    put_len(out, s.len());
    out.extend_from_slice(s.as_bytes());
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn u32(&mut self) -> Option<u32> {
        let bytes = self.take(4)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }

    fn u64(&mut self) -> Option<u64> {
        let bytes = self.take(8)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }

    fn string(&mut self) -> Option<String> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).ok()
    }
}

/// `<cache_path>.info`.
pub(crate) fn info_path_for(cache_path: &Path) -> PathBuf {
    let mut path = cache_path.as_os_str().to_owned();
    path.push(".info");
    PathBuf::from(path)
}

pub fn write_hir_cache_info(info: &HirCacheInfo, path: &Path) -> Result<(), CacheError> {
    std::fs::write(path, info.encode()).map_err(|e| CacheError::write(path, &e))
}

pub fn read_hir_cache_info(path: &Path) -> Result<HirCacheInfo, CacheError> {
    let bytes = std::fs::read(path).map_err(|e| CacheError::read(path, &e))?;
    HirCacheInfo::decode(&bytes).ok_or_else(|| CacheError::InvalidInfo {
        path: path.to_path_buf(),
    })
}

/// Recomputes the module's source hash and every dependency's hash.
pub fn are_dependencies_valid(info: &HirCacheInfo) -> bool {
    if compute_source_hash(Path::new(&info.source_path)) != info.source_hash {
        debug!(module = %info.module_name, "source changed since caching");
        return false;
    }
    for dep in &info.deps {
        if compute_source_hash(Path::new(&dep.source_path)) != dep.content_hash {
            debug!(
                module = %info.module_name,
                dependency = %dep.module_name,
                "dependency changed since caching"
            );
            return false;
        }
    }
    true
}
