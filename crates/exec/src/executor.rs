//! Bounded process execution through the resolved shell

use crate::binary::resolve_binary;
use crate::diagnostics;
use async_trait::async_trait;
use codescout_core::constants::{MAX_CAPTURED_OUTPUT_BYTES, OUTPUT_TRUNCATION_MARKER};
use codescout_core::{
    EnvironmentVariables, Error, ExecutionRequest, ExecutionResult, Outcome, Result,
};
use codescout_security::{audit_logger, AuditLogger, CommandAllowlist, SecurityValidator};
use codescout_shell::ShellDescriptor;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;

/// Host environment variables forwarded to every child process
const TRUSTED_BASE_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "LC_ALL",
    "TMPDIR",
    "TERM",
    "NO_COLOR",
    "GH_TOKEN",
    "GITHUB_TOKEN",
    "GH_HOST",
    "NPM_CONFIG_REGISTRY",
    "SYSTEMROOT",
    "COMSPEC",
    "USERPROFILE",
    "APPDATA",
    "LOCALAPPDATA",
];

/// Variables callers may never redefine through overrides; overrides add
/// to the trusted lookup environment, they do not replace it
const PROTECTED_VARS: &[&str] = &[
    "PATH",
    "SHELL",
    "COMSPEC",
    "SYSTEMROOT",
    "LD_PRELOAD",
    "LD_LIBRARY_PATH",
    "DYLD_INSERT_LIBRARIES",
    "DYLD_LIBRARY_PATH",
];

/// Trait for executing external commands
///
/// This abstraction allows testing the coalescing and service layers
/// without spawning real processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute a request, returning a classified result. `Err` is
    /// reserved for fatal spawn-level failures.
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult>;
}

/// Production executor: validates, escapes, spawns one child through the
/// resolved shell, and enforces timeout and output-size bounds
pub struct ProcessExecutor {
    allowlist: CommandAllowlist,
    shell: ShellDescriptor,
    max_output_bytes: usize,
    audit: Option<Arc<AuditLogger>>,
}

impl ProcessExecutor {
    /// Create an executor for the current host with the given allowlist.
    /// Gate decisions go to the process-wide audit logger when one has
    /// been installed; `with_audit_logger` overrides it.
    #[must_use]
    pub fn new(allowlist: CommandAllowlist) -> Self {
        Self {
            allowlist,
            shell: ShellDescriptor::for_host(None),
            max_output_bytes: MAX_CAPTURED_OUTPUT_BYTES,
            audit: audit_logger(),
        }
    }

    #[must_use]
    pub fn with_shell(mut self, shell: ShellDescriptor) -> Self {
        self.shell = shell;
        self
    }

    #[must_use]
    pub fn with_max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = max;
        self
    }

    #[must_use]
    pub fn with_audit_logger(mut self, audit: Arc<AuditLogger>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The shell this executor spawns through
    #[must_use]
    pub fn shell(&self) -> &ShellDescriptor {
        &self.shell
    }

    async fn record_gate_decision(
        &self,
        request: &ExecutionRequest,
        allowed: bool,
        reason: Option<String>,
    ) {
        if let Some(logger) = &self.audit {
            let _ = logger
                .log_command_execution(
                    request.program.binary_name(),
                    &request.subcommand,
                    request.args.as_slice(),
                    allowed,
                    reason,
                )
                .await;
        }
    }

    fn compose_environment(
        &self,
        overrides: &EnvironmentVariables,
    ) -> Result<HashMap<String, String>> {
        let mut env = HashMap::new();

        for var in TRUSTED_BASE_VARS {
            if let Ok(value) = std::env::var(var) {
                env.insert((*var).to_string(), value);
            }
        }

        for (key, value) in overrides.iter() {
            SecurityValidator::sanitize_env_var_name(key)?;
            if PROTECTED_VARS.iter().any(|p| p.eq_ignore_ascii_case(key)) {
                return Err(Error::security(format!(
                    "environment override may not redefine '{key}'"
                )));
            }
            env.insert(key.clone(), value.clone());
        }

        Ok(env)
    }

}

#[derive(Default)]
struct CappedOutput {
    retained: Vec<u8>,
    truncated: bool,
}

impl CappedOutput {
    fn into_text(self) -> String {
        let mut text = String::from_utf8_lossy(&self.retained).into_owned();
        if self.truncated {
            text.push_str(OUTPUT_TRUNCATION_MARKER);
        }
        text
    }
}

/// Drain a child output pipe, retaining at most `max` bytes.
///
/// The stream is consumed to completion either way so the child never
/// blocks on a full pipe; only retention stops at the cap, which bounds
/// memory regardless of how much the child writes.
async fn read_capped<R>(pipe: Option<R>, max: usize) -> std::io::Result<CappedOutput>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Ok(CappedOutput::default());
    };

    let mut output = CappedOutput::default();
    let mut chunk = [0u8; 8192];

    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            break;
        }

        if output.retained.len() < max {
            let take = n.min(max - output.retained.len());
            output.retained.extend_from_slice(&chunk[..take]);
            if take < n {
                output.truncated = true;
            }
        } else {
            output.truncated = true;
        }
    }

    Ok(output)
}

#[async_trait]
impl CommandRunner for ProcessExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        let binary = match resolve_binary(request.program) {
            Ok(binary) => binary,
            Err(e) => {
                let refused = format!("{} {}", request.program, request.subcommand);
                return Ok(ExecutionResult::validation_error(refused, e.to_string()));
            }
        };

        let mut tokens = Vec::with_capacity(2 + request.args.len());
        tokens.push(binary);
        tokens.push(request.subcommand.clone());
        tokens.extend(request.args.iter().cloned());
        let command_line = self.shell.render_command_line(&tokens);

        // The allowlist gate runs strictly before any spawn and is
        // independent of argument escaping
        if let Err(e) = self.allowlist.validate(request.program, &request.subcommand) {
            self.record_gate_decision(request, false, Some(e.to_string()))
                .await;
            tracing::warn!(
                program = %request.program,
                subcommand = %request.subcommand,
                "refused unregistered subcommand"
            );
            return Ok(ExecutionResult::validation_error(command_line, e.to_string()));
        }

        if let Err(e) = SecurityValidator::validate_command_args(request.args.as_slice()) {
            self.record_gate_decision(request, false, Some(e.to_string()))
                .await;
            return Ok(ExecutionResult::validation_error(command_line, e.to_string()));
        }

        let env = match self.compose_environment(&request.env_overrides) {
            Ok(env) => env,
            Err(e) => {
                return Ok(ExecutionResult::validation_error(command_line, e.to_string()));
            }
        };

        if let Some(dir) = &request.working_dir {
            if !dir.is_dir() {
                return Ok(ExecutionResult::validation_error(
                    command_line,
                    format!("working directory '{}' does not exist", dir.display()),
                ));
            }
        }

        self.record_gate_decision(request, true, None).await;

        let mut cmd = tokio::process::Command::new(&self.shell.executable);
        cmd.args(self.shell.dialect.invocation_args())
            .arg(&command_line)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &request.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %command_line, timeout = ?request.timeout, "spawning");
        let started = Instant::now();

        let mut child = cmd.spawn().map_err(|e| {
            Error::command_execution(
                self.shell.executable.clone(),
                tokens.clone(),
                format!("failed to spawn process: {e}"),
                None,
            )
        })?;

        // Both pipes are drained incrementally with bounded retention, so
        // a child streaming arbitrary volumes never grows our memory past
        // the cap
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let max = self.max_output_bytes;

        let bounded_wait = async {
            let (stdout, stderr) = tokio::join!(
                read_capped(stdout_pipe, max),
                read_capped(stderr_pipe, max)
            );
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout?, stderr?))
        };
        let waited = tokio::time::timeout(request.timeout, bounded_wait).await;

        match waited {
            Ok(Ok((status, stdout, stderr))) => {
                let stdout = stdout.into_text();
                let stderr = stderr.into_text();
                let outcome = diagnostics::classify(request.program, status.success(), &stderr);

                Ok(ExecutionResult {
                    outcome,
                    stdout,
                    stderr,
                    command_line,
                    elapsed: started.elapsed(),
                    platform: std::env::consts::OS.to_string(),
                })
            }
            Ok(Err(e)) => Err(Error::command_execution(
                self.shell.executable.clone(),
                tokens.clone(),
                format!("failed to collect process output: {e}"),
                None,
            )),
            Err(_) => {
                // A timed-out run is never a success; kill_on_drop backs
                // this up if the kill signal itself fails
                let _ = child.start_kill();
                tracing::warn!(command = %command_line, timeout = ?request.timeout, "killed after timeout");
                Ok(ExecutionResult {
                    outcome: Outcome::Timeout,
                    stdout: String::new(),
                    stderr: format!("process killed after exceeding timeout of {:?}", request.timeout),
                    command_line,
                    elapsed: started.elapsed(),
                    platform: std::env::consts::OS.to_string(),
                })
            }
        }
    }
}
