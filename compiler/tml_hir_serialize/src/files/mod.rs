//! Buffer and file entry points.

use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::Path;

use tml_hir::HirModule;
use tracing::{debug, warn};

use crate::binary::{HirBinaryReader, HirBinaryWriter};
use crate::cache_info::{are_dependencies_valid, info_path_for, read_hir_cache_info};
use crate::config::HirSerializeOptions;
use crate::error::{CacheError, HirReadError};
use crate::hash::ContentHash;
use crate::text::{HirTextReader, HirTextWriter};
use crate::HIR_MAGIC;

pub fn serialize_hir_binary(
    module: &HirModule,
    options: HirSerializeOptions,
) -> io::Result<Vec<u8>> {
    let mut writer = HirBinaryWriter::new(Vec::new(), options);
    writer.write_module(module)?;
    Ok(writer.into_inner())
}

pub fn deserialize_hir_binary(data: &[u8]) -> Result<HirModule, HirReadError> {
    let mut reader = HirBinaryReader::new(data);
    let module = reader.read_module();
    match reader.error() {
        Some(err) => Err(err.clone()),
        None => Ok(module),
    }
}

pub fn serialize_hir_text(module: &HirModule, options: HirSerializeOptions) -> String {
    let mut writer = HirTextWriter::new(Vec::new(), options);
    writer.write_module(module);
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

pub fn deserialize_hir_text(text: &str) -> Result<HirModule, HirReadError> {
    let mut reader = HirTextReader::new(text);
    let module = reader.read_module();
    match reader.error() {
        Some(err) => Err(err.clone()),
        None => Ok(module),
    }
}

/// Writes `module` to `path` in the binary format, or as a text dump.
pub fn write_hir_file(
    module: &HirModule,
    path: &Path,
    binary: bool,
    options: HirSerializeOptions,
) -> Result<(), CacheError> {
    let file = File::create(path).map_err(|e| CacheError::write(path, &e))?;
    let out = BufWriter::new(file);
    if binary {
        HirBinaryWriter::new(out, options)
            .write_module(module)
            .map_err(|e| CacheError::write(path, &e))
    } else {
        let mut writer = HirTextWriter::new(out, options);
        writer.write_module(module);
        writer
            .into_inner()
            .into_inner()
            .map_err(|e| CacheError::write(path, e.error()))?;
        Ok(())
    }
}

/// Reads a HIR file, picking the format from its magic number.
pub fn read_hir_file(path: &Path) -> Result<HirModule, CacheError> {
    let bytes = std::fs::read(path).map_err(|e| CacheError::read(path, &e))?;
    let decoded = if bytes.get(..4) == Some(HIR_MAGIC.to_le_bytes().as_slice()) {
        deserialize_hir_binary(&bytes)
    } else {
        deserialize_hir_text(&String::from_utf8_lossy(&bytes))
    };
    decoded.map_err(|source| CacheError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// The content hash recorded in a binary HIR file's header.
///
/// `None` when the file is missing, too short or not a HIR file.
pub fn get_hir_cache_hash(path: &Path) -> Option<ContentHash> {
    let mut header = [0u8; 16];
    File::open(path).ok()?.read_exact(&mut header).ok()?;
    let (magic, rest) = header.split_at(4);
    if magic != HIR_MAGIC.to_le_bytes() {
        return None;
    }
    let hash: [u8; 8] = rest.get(4..12)?.try_into().ok()?;
    Some(ContentHash::new(u64::from_le_bytes(hash)))
}

/// Whether the cache entry at `cache_path` was built from `source_hash` and
/// every dependency it recorded is unchanged.
///
/// Decided entirely by the `<cache_path>.info` sidecar; without one the
/// entry is treated as stale.
pub fn is_hir_cache_valid(cache_path: &Path, source_hash: ContentHash) -> bool {
    let info_path = info_path_for(cache_path);
    if !info_path.exists() {
        debug!(path = %cache_path.display(), "no cache sidecar");
        return false;
    }
    let info = match read_hir_cache_info(&info_path) {
        Ok(info) => info,
        Err(err) => {
            warn!(error = %err, "unreadable cache sidecar");
            return false;
        }
    };
    if info.source_hash != source_hash {
        debug!(module = %info.module_name, "cached source hash differs");
        return false;
    }
    let valid = are_dependencies_valid(&info);
    debug!(module = %info.module_name, valid, "checked HIR cache");
    valid
}
