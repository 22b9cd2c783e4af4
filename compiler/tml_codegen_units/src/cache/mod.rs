//! Object file cache keyed by codegen unit fingerprint.
//!
//! A unit whose fingerprint matches a cached object skips codegen
//! entirely. The manifest remembers which fingerprint each unit name was
//! last built with. Objects a changed unit no longer refers to are removed
//! by [`CguObjectCache::prune`], once a whole plan has been resolved, so a
//! unit later in the same plan can still reuse them.
//!
//! ```text
//! <cache_dir>/
//! ├── manifest.bin          # bincode-encoded CacheManifest
//! ├── <fingerprint>.o
//! └── ...
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::emit::EmitError;
use crate::fingerprint::Fingerprint;

const MANIFEST_FILE: &str = "manifest.bin";
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheManifest {
    version: u32,
    /// Unit name to the fingerprint of its cached object.
    units: BTreeMap<String, Fingerprint>,
}

pub struct CguObjectCache {
    dir: PathBuf,
    manifest: CacheManifest,
    /// Fingerprints some unit moved away from since the last prune.
    superseded: Vec<Fingerprint>,
}

impl CguObjectCache {
    /// Open (creating if needed) the cache at `dir`.
    ///
    /// A missing, corrupt or outdated manifest starts the cache empty.
    pub fn open(dir: &Path) -> Result<Self, EmitError> {
        std::fs::create_dir_all(dir).map_err(|e| EmitError::CreateDir {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = match std::fs::read(&manifest_path) {
            Ok(bytes) => match bincode::deserialize::<CacheManifest>(&bytes) {
                Ok(manifest) if manifest.version == MANIFEST_VERSION => manifest,
                Ok(manifest) => {
                    debug!(version = manifest.version, "discarding outdated CGU manifest");
                    CacheManifest::empty()
                }
                Err(e) => {
                    warn!(path = %manifest_path.display(), error = %e, "corrupt CGU manifest");
                    CacheManifest::empty()
                }
            },
            Err(_) => CacheManifest::empty(),
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            manifest,
            superseded: Vec::new(),
        })
    }

    /// The cached object for `fingerprint`, if present on disk.
    pub fn lookup(&self, fingerprint: Fingerprint) -> Option<PathBuf> {
        let path = self.object_path(fingerprint);
        path.exists().then_some(path)
    }

    /// Copy `bytes` into the cache as the object for `unit_name`.
    ///
    /// The unit's previous object stays on disk until the next
    /// [`prune`](Self::prune).
    pub fn store(
        &mut self,
        unit_name: &str,
        fingerprint: Fingerprint,
        bytes: &[u8],
    ) -> Result<PathBuf, EmitError> {
        let path = self.object_path(fingerprint);
        std::fs::write(&path, bytes).map_err(|e| EmitError::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.remember(unit_name, fingerprint);
        Ok(path)
    }

    /// Record that `unit_name` now uses the object for `fingerprint`.
    pub fn remember(&mut self, unit_name: &str, fingerprint: Fingerprint) {
        let previous = self
            .manifest
            .units
            .insert(unit_name.to_string(), fingerprint);
        if let Some(old) = previous.filter(|&old| old != fingerprint) {
            self.superseded.push(old);
        }
    }

    /// Delete objects that units moved away from and nothing refers to now.
    ///
    /// Returns how many objects were removed.
    pub fn prune(&mut self) -> usize {
        let mut removed = 0;
        for old in std::mem::take(&mut self.superseded) {
            if self.manifest.units.values().any(|&fp| fp == old) {
                continue;
            }
            if std::fs::remove_file(self.object_path(old)).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "pruned orphaned CGU objects");
        }
        removed
    }

    /// The fingerprint `unit_name` was last stored with.
    pub fn fingerprint_of(&self, unit_name: &str) -> Option<Fingerprint> {
        self.manifest.units.get(unit_name).copied()
    }

    pub fn len(&self) -> usize {
        self.manifest.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.units.is_empty()
    }

    /// Persist the manifest.
    pub fn save(&self) -> Result<(), EmitError> {
        let path = self.dir.join(MANIFEST_FILE);
        let bytes = bincode::serialize(&self.manifest).map_err(|e| EmitError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, bytes).map_err(|e| EmitError::Manifest {
            path,
            message: e.to_string(),
        })
    }

    /// Remove every cached object and forget all units.
    pub fn clear(&mut self) -> Result<(), EmitError> {
        let fingerprints: Vec<Fingerprint> = self.manifest.units.values().copied().collect();
        for fingerprint in fingerprints {
            let _ = std::fs::remove_file(self.object_path(fingerprint));
        }
        self.manifest.units.clear();
        self.superseded.clear();
        self.save()
    }

    fn object_path(&self, fingerprint: Fingerprint) -> PathBuf {
        self.dir.join(format!("{fingerprint}.o"))
    }
}

impl CacheManifest {
    fn empty() -> Self {
        CacheManifest {
            version: MANIFEST_VERSION,
            units: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests;
