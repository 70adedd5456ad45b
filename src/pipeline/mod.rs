//! Release pipeline
//!
//! Three-phase pattern:
//! 1. Gate - read the changelog and decide whether there is anything to release
//! 2. Plan - turn the decision and configuration into ordered steps (pure)
//! 3. Execute - run the steps strictly in order, stopping at the first failure

mod execute;
mod gate;
mod plan;

pub use execute::{Pipeline, PipelineOutcome};
pub use gate::{decide, release_gate};
pub use plan::{PipelineStep, plan_pipeline};
