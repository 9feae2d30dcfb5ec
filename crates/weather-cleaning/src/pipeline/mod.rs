//! Pipeline module.
//!
//! [`Analyzer`] owns the table and exposes every cleaning operation;
//! [`Pipeline`] drives the configured sequence over it.

mod analyzer;
mod builder;
pub mod progress;

pub use analyzer::Analyzer;
pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosurePhaseReporter, Phase, PhaseReporter, PhaseUpdate};
