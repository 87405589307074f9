//! Pipeline module.
//!
//! This module provides the contact cleaning pipeline and its progress
//! reporting types.

mod builder;
pub mod progress;

pub use builder::{CleaningResult, ContactPipeline, ContactPipelineBuilder};
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
