//! CLI command implementations

mod context;
mod label;
mod precheck;
mod release;
pub mod style;

pub use context::CommandContext;
pub use label::{LabelOptions, run_label};
pub use precheck::run_precheck;
pub use release::run_release;
