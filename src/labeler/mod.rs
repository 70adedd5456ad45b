//! Pull request labeling
//!
//! Marks reverts and releases. A release PR additionally triggers the
//! downstream release workflow at the current ref.

mod apply;
mod policy;

pub use apply::{LabelOutcome, apply_labels, gather_signal};
pub use policy::{
    LabelPlan, RELEASE_LABEL, REVERT_LABEL, ReleasePolicy, is_release, is_revert, plan_labels,
};
