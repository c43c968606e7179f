//! Tournament generation pipeline.
//!
//! - `lanes`: collect qualified lanes
//! - `rounds`: calculate required rounds
//! - `target_types`: place target types on lanes
//! - `targets`: place targets on lanes
//! - `assignments`: emit per-round assignments with sampled stakes

pub mod assignments;
pub mod lanes;
pub mod pipeline;
pub mod rounds;
pub mod sampler;
pub mod target_types;
pub mod targets;

pub use pipeline::{
    GenerationContext, GenerationOutcome, GenerationPipeline, GenerationStep, Placement,
};
pub use sampler::{integer_bounds, sample_stakes};
