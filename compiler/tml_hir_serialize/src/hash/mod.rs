//! Content hashing for cache invalidation.
//!
//! FNV-1a over a canonical traversal of the module's declarations.
//! Expression bodies are not part of the digest: a body-only edit keeps the
//! HIR hash and is caught by the source hash instead.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tml_hir::types::type_to_string;
use tml_hir::{HirEnum, HirFunction, HirId, HirModule, HirStruct, HirType};

const FNV_OFFSET: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

/// A 64-bit content digest. Only meaningful for equality checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentHash(u64);

impl ContentHash {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        u64::from_str_radix(s, 16).ok().map(Self)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Incremental FNV-1a hasher. Integers are fed little-endian.
#[derive(Debug, Clone)]
pub struct ContentHasher {
    state: u64,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher {
    pub fn new() -> Self {
        ContentHasher { state: FNV_OFFSET }
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.state = (self.state ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_u8(byte);
        }
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Length-prefixed, so `("ab", "c")` and `("a", "bc")` differ.
    pub fn write_str(&mut self, s: &str) {
        self.write_len(s.len());
        self.write_bytes(s.as_bytes());
    }

    fn write_len(&mut self, len: usize) {
        self.write_u64(len as u64);
    }

    fn write_id(&mut self, id: HirId) {
        self.write_u64(id.raw());
    }

    fn write_type(&mut self, ty: &HirType) {
        match ty {
            Some(_) => self.write_str(&type_to_string(ty)),
            None => self.write_str("null"),
        }
    }

    #[must_use]
    pub fn finish(&self) -> ContentHash {
        ContentHash(self.state)
    }
}

/// FNV-1a of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    let mut hasher = ContentHasher::new();
    hasher.write_bytes(bytes);
    hasher.finish()
}

/// Digest of a module's declaration surface.
pub fn compute_hir_hash(module: &HirModule) -> ContentHash {
    let mut h = ContentHasher::new();
    h.write_str(&module.name);
    h.write_str(&module.source_path);

    h.write_len(module.structs.len());
    for s in &module.structs {
        hash_struct(&mut h, s);
    }

    h.write_len(module.enums.len());
    for e in &module.enums {
        hash_enum(&mut h, e);
    }

    h.write_len(module.functions.len());
    for f in &module.functions {
        hash_function(&mut h, f);
    }

    h.write_len(module.behaviors.len());
    for b in &module.behaviors {
        h.write_id(b.id);
        h.write_str(&b.name);
        h.write_len(b.methods.len());
    }

    h.write_len(module.impls.len());
    for i in &module.impls {
        h.write_id(i.id);
        h.write_str(&i.type_name);
        h.write_len(i.methods.len());
    }

    h.write_len(module.constants.len());
    for c in &module.constants {
        h.write_id(c.id);
        h.write_str(&c.name);
        h.write_type(&c.ty);
    }

    h.write_len(module.imports.len());
    for import in &module.imports {
        h.write_str(import);
    }

    h.finish()
}

fn hash_struct(h: &mut ContentHasher, s: &HirStruct) {
    h.write_id(s.id);
    h.write_str(&s.name);
    h.write_str(&s.mangled_name);
    h.write_len(s.fields.len());
    for field in &s.fields {
        h.write_str(&field.name);
        h.write_type(&field.ty);
        h.write_bool(field.is_public);
    }
    h.write_bool(s.is_public);
}

fn hash_enum(h: &mut ContentHasher, e: &HirEnum) {
    h.write_id(e.id);
    h.write_str(&e.name);
    h.write_str(&e.mangled_name);
    h.write_len(e.variants.len());
    for variant in &e.variants {
        h.write_str(&variant.name);
        h.write_u32(variant.index);
        h.write_len(variant.payload_types.len());
        for ty in &variant.payload_types {
            h.write_type(ty);
        }
    }
    h.write_bool(e.is_public);
}

fn hash_function(h: &mut ContentHasher, f: &HirFunction) {
    h.write_id(f.id);
    h.write_str(&f.name);
    h.write_str(&f.mangled_name);
    h.write_len(f.params.len());
    for param in &f.params {
        h.write_str(&param.name);
        h.write_type(&param.ty);
        h.write_bool(param.is_mut);
    }
    h.write_type(&f.return_type);
    h.write_bool(f.body.is_some());
    h.write_bool(f.is_public);
    h.write_bool(f.is_async);
    h.write_bool(f.is_extern);
}

/// Digest of a source file's path and contents.
///
/// A file that cannot be opened hashes its path only.
pub fn compute_source_hash(path: &Path) -> ContentHash {
    let mut h = ContentHasher::new();
    h.write_str(&path.to_string_lossy());

    if let Ok(mut file) = File::open(path) {
        let mut buffer = [0u8; 8192];
        loop {
            match file.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(n) => h.write_bytes(&buffer[..n]),
            }
        }
    }

    h.finish()
}

#[cfg(test)]
mod tests;
