//! Execution request and result types shared across the workspace

use super::commands::{CommandArguments, EnvironmentVariables};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_EXECUTION_TIMEOUT;

/// Identity of a wrapped external program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramId {
    /// The GitHub CLI (`gh`)
    Gh,
    /// The npm CLI (`npm`)
    Npm,
}

impl ProgramId {
    /// Default binary name looked up on `PATH`
    #[must_use]
    pub fn binary_name(&self) -> &'static str {
        match self {
            ProgramId::Gh => "gh",
            ProgramId::Npm => "npm",
        }
    }

    /// Environment variable that may carry an absolute-path override for
    /// the program binary. Relative or non-executable values are rejected
    /// by the executor before use.
    #[must_use]
    pub fn path_override_var(&self) -> &'static str {
        match self {
            ProgramId::Gh => "CODESCOUT_GH_PATH",
            ProgramId::Npm => "CODESCOUT_NPM_PATH",
        }
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// A fully specified request to run one subcommand of a wrapped program
///
/// The `subcommand` must pass the allowlist gate before this request ever
/// reaches the process executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub program: ProgramId,
    pub subcommand: String,
    pub args: CommandArguments,
    pub timeout: Duration,
    pub working_dir: Option<PathBuf>,
    pub env_overrides: EnvironmentVariables,
    pub cache_enabled: bool,
}

impl ExecutionRequest {
    /// Create a request with default timeout, no working directory, no
    /// environment overrides, and caching enabled
    #[must_use]
    pub fn new(program: ProgramId, subcommand: impl Into<String>) -> Self {
        Self {
            program,
            subcommand: subcommand.into(),
            args: CommandArguments::new(),
            timeout: DEFAULT_EXECUTION_TIMEOUT,
            working_dir: None,
            env_overrides: EnvironmentVariables::new(),
            cache_enabled: true,
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: CommandArguments) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_env_overrides(mut self, env: EnvironmentVariables) -> Self {
        self.env_overrides = env;
        self
    }

    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

/// Classification of a finished (or refused) execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Process ran and its diagnostics, if any, were all benign
    Success,
    /// Process ran and produced non-benign diagnostic output
    DiagnosticError,
    /// Process was killed after exceeding its timeout
    Timeout,
    /// Request was refused before any process was spawned
    ValidationError,
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Result of executing (or refusing) a request
///
/// Invariant: `Outcome::ValidationError` results never correspond to a
/// spawned process; `command_line` then records the command that was
/// refused, for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub outcome: Outcome,
    pub stdout: String,
    pub stderr: String,
    pub command_line: String,
    pub elapsed: Duration,
    pub platform: String,
}

impl ExecutionResult {
    /// Create a validation-refusal result. No process was spawned.
    #[must_use]
    pub fn validation_error(command_line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::ValidationError,
            stdout: String::new(),
            stderr: reason.into(),
            command_line: command_line.into(),
            elapsed: Duration::ZERO,
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Convert to the envelope shape handed back to tool adapters
    #[must_use]
    pub fn envelope(&self) -> ResultEnvelope {
        ResultEnvelope {
            success: self.outcome.is_success(),
            payload: self.stdout.clone(),
            diagnostic: if self.stderr.is_empty() {
                None
            } else {
                Some(self.stderr.clone())
            },
            audit_command: self.command_line.clone(),
        }
    }
}

/// Outbound envelope returned to the calling tool adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub audit_command: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_binary_names() {
        assert_eq!(ProgramId::Gh.binary_name(), "gh");
        assert_eq!(ProgramId::Npm.binary_name(), "npm");
        assert_eq!(ProgramId::Gh.path_override_var(), "CODESCOUT_GH_PATH");
    }

    #[test]
    fn test_request_builder_chain() {
        let req = ExecutionRequest::new(ProgramId::Gh, "search")
            .with_timeout(Duration::from_secs(5))
            .with_cache_enabled(false);
        assert_eq!(req.subcommand, "search");
        assert_eq!(req.timeout, Duration::from_secs(5));
        assert!(!req.cache_enabled);
        assert!(req.args.is_empty());
    }

    #[test]
    fn test_validation_error_result_has_no_output() {
        let result = ExecutionResult::validation_error("gh rm", "subcommand not allowed");
        assert_eq!(result.outcome, Outcome::ValidationError);
        assert!(result.stdout.is_empty());
        assert_eq!(result.elapsed, Duration::ZERO);

        let envelope = result.envelope();
        assert!(!envelope.success);
        assert_eq!(envelope.audit_command, "gh rm");
        assert_eq!(envelope.diagnostic.as_deref(), Some("subcommand not allowed"));
    }
}
