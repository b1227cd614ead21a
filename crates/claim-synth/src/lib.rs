//! Synthetic CMS-1500 claim generation.
//!
//! [`RecordAssembler`] is the entry point; the other modules hold the
//! identifier generator, weighted sampler and clinical reference data it
//! draws from.

pub mod assembler;
pub mod catalog;
pub mod demographics;
pub mod npi;
pub mod options;
pub mod procedures;
pub mod reference;
pub mod sampler;

pub use assembler::RecordAssembler;
pub use catalog::{compatible_procedures, diagnosis_pool, procedure_description};
pub use npi::generate_npi;
pub use options::{GeneratorOptions, PresenceRates};
pub use sampler::WeightedSampler;
