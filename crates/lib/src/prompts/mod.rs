//! # Prompt Templates
//!
//! Prompt text sent to the inference service, kept apart from the code that
//! sends it so it can be read and tuned in one place.

pub mod analysis;

pub use analysis::build_analysis_prompt;
