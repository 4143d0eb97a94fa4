//! Core types and errors for codescout
//!
//! This crate provides the foundational types used across the workspace:
//! the error taxonomy, the execution request/result model, and the
//! type-safe wrappers for command arguments and environment variables.

pub mod constants;
pub mod errors;
pub mod types;

pub use errors::{Error, Result};
pub use types::{
    CommandArguments, EnvironmentVariables, ExecutionRequest, ExecutionResult, Outcome, ProgramId,
    ResultEnvelope,
};
