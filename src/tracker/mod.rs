//! Process-tree state derived from the pipeline's event stream.
//!
//! [`ProcessTracker`] folds one [`crate::events::WireEvent`] at a time into
//! an ordered collection of [`ProcessNode`]s. The fold is synchronous, total
//! and pure apart from its return value; events that reference unknown runs
//! or carry unparsable keys degrade to no-ops so the view stays alive under
//! protocol drift.

mod node;
mod reducer;

pub use node::{NodeStatus, NodeStep, ProcessNode, StepStatus};
pub use reducer::{
    ProcessTracker, SessionEffect, RUN_DOCUMENT_EXTRACTION, RUN_QUESTION_GENERATION,
};
