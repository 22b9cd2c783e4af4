//! Driving a native backend over a partition plan.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crate::cache::CguObjectCache;
use crate::config::PartitionConfig;
use crate::emit::{write_object_to_temp, EmitError};
use crate::fingerprint::Fingerprint;
use crate::lowered::LoweredModule;
use crate::partition::{partition, PartitionPlan};

/// A native code generator.
///
/// `generate` receives the whole module so calls into other units can be
/// declared, and defines only the functions at `functions`.
pub trait CodegenBackend: Sync {
    fn generate(&self, module: &LoweredModule, functions: &[usize])
        -> Result<Vec<u8>, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("function index {index} is out of range")]
    UnknownFunction { index: usize },

    #[error("{0}")]
    Codegen(String),
}

/// One object file produced for a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    /// The unit name, or the module name for monolithic codegen.
    pub name: String,
    pub object_path: PathBuf,
    pub fingerprint: Fingerprint,
    /// Taken from the object cache without running the backend.
    pub reused: bool,
}

struct Job {
    name: String,
    functions: Vec<usize>,
    fingerprint: Fingerprint,
}

/// Partition `module`, then generate one object per unit in parallel.
///
/// With `config.cache_dir` set, units whose fingerprint has a cached
/// object are not regenerated, and fresh objects are added to the cache.
/// Objects no unit refers to any more are pruned after every unit has been
/// resolved. Results follow unit order.
pub fn compile_partitioned(
    backend: &impl CodegenBackend,
    module: &LoweredModule,
    config: &PartitionConfig,
) -> Result<Vec<CompiledUnit>, EmitError> {
    let jobs = match partition(module, config.requested_cgus) {
        PartitionPlan::Monolithic { fingerprint } => vec![Job {
            name: module.name.clone(),
            functions: (0..module.functions.len()).collect(),
            fingerprint,
        }],
        PartitionPlan::Partitioned(units) => units
            .into_iter()
            .map(|unit| Job {
                name: unit.name,
                functions: unit.functions,
                fingerprint: unit.fingerprint,
            })
            .collect(),
    };

    let mut cache = config
        .cache_dir
        .as_deref()
        .map(CguObjectCache::open)
        .transpose()?;

    let mut compiled: Vec<Option<CompiledUnit>> = Vec::with_capacity(jobs.len());
    let mut pending = Vec::new();
    for (index, job) in jobs.iter().enumerate() {
        let hit = cache.as_mut().and_then(|cache| {
            let path = cache.lookup(job.fingerprint)?;
            cache.remember(&job.name, job.fingerprint);
            Some(path)
        });
        match hit {
            Some(object_path) => compiled.push(Some(CompiledUnit {
                name: job.name.clone(),
                object_path,
                fingerprint: job.fingerprint,
                reused: true,
            })),
            None => {
                compiled.push(None);
                pending.push(index);
            }
        }
    }
    let reused = jobs.len() - pending.len();

    let fresh: Vec<(usize, Vec<u8>, PathBuf)> = pending
        .par_iter()
        .map(|&index| {
            let job = &jobs[index];
            let bytes =
                backend
                    .generate(module, &job.functions)
                    .map_err(|source| EmitError::Backend {
                        unit: job.name.clone(),
                        source,
                    })?;
            let path = write_object_to_temp(&bytes, &job.name)?;
            Ok((index, bytes, path))
        })
        .collect::<Result<_, EmitError>>()?;

    for (index, bytes, object_path) in fresh {
        let job = &jobs[index];
        if let Some(cache) = cache.as_mut() {
            cache.store(&job.name, job.fingerprint, &bytes)?;
        }
        compiled[index] = Some(CompiledUnit {
            name: job.name.clone(),
            object_path,
            fingerprint: job.fingerprint,
            reused: false,
        });
    }
    if let Some(cache) = cache.as_mut() {
        cache.prune();
        cache.save()?;
    }

    debug!(
        module = %module.name,
        units = jobs.len(),
        reused,
        "compiled codegen units"
    );
    Ok(compiled.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests;
