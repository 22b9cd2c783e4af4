//! Assigning functions to codegen units.

use tracing::debug;

use crate::fingerprint::{combine_cgu_fingerprint, fingerprint_function, fnv1a, Fingerprint};
use crate::lowered::LoweredModule;

/// A disjoint subset of a module's functions, compiled as one object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenUnit {
    /// `<module>.cgu<index>`.
    pub name: String,
    /// Indices into `LoweredModule::functions`, ascending.
    pub functions: Vec<usize>,
    /// One per entry of `functions`, in the same order.
    pub function_fingerprints: Vec<Fingerprint>,
    pub fingerprint: Fingerprint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionPlan {
    /// Compile the whole module as a single object.
    Monolithic { fingerprint: Fingerprint },
    Partitioned(Vec<CodegenUnit>),
}

impl PartitionPlan {
    /// Number of objects this plan produces.
    pub fn unit_count(&self) -> usize {
        match self {
            PartitionPlan::Monolithic { .. } => 1,
            PartitionPlan::Partitioned(units) => units.len(),
        }
    }
}

/// Split `module` into at most `requested` units.
///
/// The effective count is `requested` capped at the number of functions
/// and raised to at least one. Each function goes to unit
/// `fnv1a(name) % effective`; units nobody hashed into are dropped, so
/// the result never contains an empty unit. When there are at least as
/// many units as functions, every function gets a unit of its own.
pub fn partition(module: &LoweredModule, requested: usize) -> PartitionPlan {
    let fingerprints: Vec<Fingerprint> = module
        .functions
        .iter()
        .map(fingerprint_function)
        .collect();

    let effective = requested.min(module.functions.len()).max(1);
    if effective == 1 {
        debug!(module = %module.name, functions = fingerprints.len(), "monolithic codegen");
        return PartitionPlan::Monolithic {
            fingerprint: combine_cgu_fingerprint(&fingerprints),
        };
    }

    let buckets: Vec<Vec<usize>> = if effective == module.functions.len() {
        // Hashing would merge colliding names; give each function its own unit.
        (0..effective).map(|index| vec![index]).collect()
    } else {
        let mut buckets = vec![Vec::new(); effective];
        for (index, func) in module.functions.iter().enumerate() {
            buckets[bucket_for(&func.name, effective)].push(index);
        }
        buckets
    };

    let units: Vec<CodegenUnit> = buckets
        .into_iter()
        .enumerate()
        .filter(|(_, members)| !members.is_empty())
        .map(|(slot, functions)| {
            let function_fingerprints: Vec<Fingerprint> =
                functions.iter().map(|&i| fingerprints[i]).collect();
            CodegenUnit {
                name: format!("{}.cgu{slot}", module.name),
                fingerprint: combine_cgu_fingerprint(&function_fingerprints),
                functions,
                function_fingerprints,
            }
        })
        .collect();

    debug!(
        module = %module.name,
        requested,
        effective,
        units = units.len(),
        "partitioned module"
    );
    PartitionPlan::Partitioned(units)
}

fn bucket_for(name: &str, effective: usize) -> usize {
    // `effective` fits in u64 and the remainder is below it.
    (fnv1a(name.as_bytes()) % effective as u64) as usize
}

#[cfg(test)]
mod tests;
