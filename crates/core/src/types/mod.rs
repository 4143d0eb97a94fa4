//! Shared type definitions

pub mod commands;
pub mod execution;

pub use commands::{CommandArguments, EnvironmentVariables};
pub use execution::{
    ExecutionRequest, ExecutionResult, Outcome, ProgramId, ResultEnvelope,
};
