//! Structural fingerprints for functions and codegen units.
//!
//! A function fingerprint covers its shape, not its operands: parameter
//! names and ids, each block's id with the variant and result id of every
//! instruction, the terminator variant, attributes and flags. A unit's
//! fingerprint XORs its members' fingerprints into a seed, so it depends
//! on the member set but not on member order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lowered::LoweredFunction;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Starting value for [`combine_cgu_fingerprint`].
pub const CGU_FINGERPRINT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// A 64-bit structural digest.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Fingerprint(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// FNV-1a over raw bytes.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut fnv = Fnv::new();
    fnv.bytes(bytes);
    fnv.0
}

struct Fnv(u64);

impl Fnv {
    fn new() -> Self {
        Fnv(FNV_OFFSET)
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn u8(&mut self, v: u8) {
        self.bytes(&[v]);
    }

    fn u32(&mut self, v: u32) {
        self.bytes(&v.to_le_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.bytes(&v.to_le_bytes());
    }

    /// Length-prefixed so adjacent strings cannot run together.
    fn str(&mut self, s: &str) {
        self.u64(s.len() as u64);
        self.bytes(s.as_bytes());
    }
}

pub fn fingerprint_function(func: &LoweredFunction) -> Fingerprint {
    let mut fnv = Fnv::new();
    fnv.str(&func.name);

    fnv.u64(func.params.len() as u64);
    for param in &func.params {
        fnv.str(&param.name);
        fnv.u32(param.id);
    }

    fnv.u64(func.blocks.len() as u64);
    for block in &func.blocks {
        fnv.u32(block.id);
        fnv.u64(block.instructions.len() as u64);
        for inst in &block.instructions {
            fnv.u8(inst.kind.discriminant());
            match inst.result {
                Some(id) => {
                    fnv.u8(1);
                    fnv.u32(id);
                }
                None => fnv.u8(0),
            }
        }
        fnv.u8(block.terminator.discriminant());
    }

    fnv.u64(func.attributes.len() as u64);
    for attr in &func.attributes {
        fnv.str(attr);
    }
    fnv.u32(func.flags.bits());

    Fingerprint(fnv.0)
}

/// Rolling XOR of member fingerprints over [`CGU_FINGERPRINT_SEED`].
pub fn combine_cgu_fingerprint(members: &[Fingerprint]) -> Fingerprint {
    let combined = members
        .iter()
        .fold(CGU_FINGERPRINT_SEED, |acc, fp| acc ^ fp.0);
    Fingerprint(combined)
}
