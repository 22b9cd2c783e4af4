//! HIR serialization and incremental cache metadata.
//!
//! - [`HirBinaryWriter`] / [`HirBinaryReader`]: the compact `.thir` cache format
//! - [`HirTextWriter`]: a human-readable dump for debugging (write-only)
//! - [`compute_hir_hash`] / [`compute_source_hash`]: FNV-1a change detection
//! - [`HirCacheInfo`]: the `.info` sidecar recording what a cache entry was built from
//! - [`HirCacheConfig`]: path layout plus store/load helpers for a cache directory
//!
//! # Binary Layout
//!
//! ```text
//! u32 magic "THIR" | u16 major | u16 minor | u64 content hash   (16-byte header)
//! u8 flags (bit 0: spans present)
//! module: name, source_path, structs, enums, behaviors, impls,
//!         functions, constants, imports
//! ```
//!
//! All integers are little-endian. Types are stored as their printable form,
//! so generic and reference structure does not survive a round trip.

mod binary;
mod cache_info;
mod config;
mod error;
mod files;
mod hash;
mod stack;
mod text;

#[cfg(test)]
mod test_helpers;

pub use binary::{HirBinaryReader, HirBinaryWriter};
pub use cache_info::{
    are_dependencies_valid, read_hir_cache_info, write_hir_cache_info, HirCacheInfo,
    HirDependency, CACHE_INFO_MAGIC,
};
pub use config::{HirCacheConfig, HirSerializeOptions};
pub use error::{CacheError, HirReadError};
pub use files::{
    deserialize_hir_binary, deserialize_hir_text, get_hir_cache_hash, is_hir_cache_valid,
    read_hir_file, serialize_hir_binary, serialize_hir_text, write_hir_file,
};
pub use hash::{compute_hir_hash, compute_source_hash, hash_bytes, ContentHash, ContentHasher};
pub use text::{HirTextReader, HirTextWriter};

/// "THIR" in little-endian byte order.
pub const HIR_MAGIC: u32 = 0x5249_4854;
pub const HIR_VERSION_MAJOR: u16 = 1;
pub const HIR_VERSION_MINOR: u16 = 0;
