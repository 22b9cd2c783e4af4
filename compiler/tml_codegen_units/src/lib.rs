//! Codegen unit (CGU) partitioning.
//!
//! Splits a lowered module's functions into disjoint units that can be
//! compiled in parallel and cached independently:
//!
//! 1. [`partition`] fingerprints every function once, then assigns each
//!    function to a unit by hashing its name. A single effective unit
//!    takes the [`PartitionPlan::Monolithic`] path.
//! 2. [`compile_partitioned`] hands each unit to a [`CodegenBackend`] and
//!    writes the object bytes to a uniquely named temp file.
//! 3. With a cache directory configured, [`CguObjectCache`] keeps objects
//!    keyed by unit fingerprint so unchanged units skip codegen.

mod backend;
mod cache;
mod config;
mod emit;
mod fingerprint;
mod lowered;
mod partition;

#[cfg(test)]
mod test_helpers;

pub use backend::{compile_partitioned, BackendError, CodegenBackend, CompiledUnit};
pub use cache::CguObjectCache;
pub use config::PartitionConfig;
pub use emit::{write_object_to_dir, write_object_to_temp, EmitError};
pub use fingerprint::{
    combine_cgu_fingerprint, fingerprint_function, fnv1a, Fingerprint, CGU_FINGERPRINT_SEED,
};
pub use lowered::{
    BasicBlock, Constant, FunctionFlags, InstKind, Instruction, LoweredFunction, LoweredModule,
    LoweredParam, Terminator, Value,
};
pub use partition::{partition, CodegenUnit, PartitionPlan};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for debug output.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=tml_codegen_units=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
