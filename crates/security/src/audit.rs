//! Audit logging for security-sensitive operations

use chrono::{DateTime, Utc};
use codescout_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Audit event severity levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuditLevel {
    Info,
    Warning,
    Critical,
}

/// Types of audit events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditEventType {
    /// Allowlist decisions for command execution
    CommandExecution {
        program: String,
        subcommand: String,
        args: Vec<String>,
        allowed: bool,
        reason: Option<String>,
    },
    /// Other security validation events
    SecurityValidation {
        validation_type: String,
        target: String,
        passed: bool,
        details: Option<String>,
    },
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub level: AuditLevel,
    pub event_type: AuditEventType,
    pub session_id: String,
}

/// Audit logger configuration
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub enabled: bool,
    pub log_file: Option<PathBuf>,
    pub min_level: AuditLevel,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: None,
            min_level: AuditLevel::Info,
        }
    }
}

/// Audit logger for tracking security-sensitive operations
///
/// Entries are serialized as JSON lines to the configured file; without a
/// file the logger degrades to `tracing` events only.
pub struct AuditLogger {
    config: AuditConfig,
    session_id: String,
    writer: Arc<Mutex<Option<Box<dyn Write + Send>>>>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(config: AuditConfig) -> Result<Self> {
        let session_id = uuid::Uuid::new_v4().to_string();

        let writer: Option<Box<dyn Write + Send>> = if let Some(ref path) = config.log_file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::FileSystem {
                    path: path.clone(),
                    operation: "open".to_string(),
                    source: e,
                })?;
            Some(Box::new(file))
        } else {
            None
        };

        Ok(Self {
            config,
            session_id,
            writer: Arc::new(Mutex::new(writer)),
        })
    }

    /// Get the current session ID
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Log an audit event
    pub async fn log(&self, level: AuditLevel, event_type: AuditEventType) -> Result<()> {
        if !self.config.enabled || level < self.config.min_level {
            return Ok(());
        }

        let entry = AuditEntry {
            timestamp: Utc::now(),
            level,
            event_type,
            session_id: self.session_id.clone(),
        };

        match level {
            AuditLevel::Info => tracing::info!(session = %entry.session_id, event = ?entry.event_type, "audit"),
            AuditLevel::Warning => tracing::warn!(session = %entry.session_id, event = ?entry.event_type, "audit"),
            AuditLevel::Critical => tracing::error!(session = %entry.session_id, event = ?entry.event_type, "audit"),
        }

        let mut writer = self.writer.lock().await;
        if let Some(ref mut sink) = *writer {
            let line = serde_json::to_string(&entry)?;
            sink.write_all(line.as_bytes())
                .and_then(|()| sink.write_all(b"\n"))
                .and_then(|()| sink.flush())
                .map_err(|e| Error::file_system(
                    self.config.log_file.clone().unwrap_or_default(),
                    "append audit entry",
                    e,
                ))?;
        }

        Ok(())
    }

    /// Record an allowlist decision for a command execution attempt
    pub async fn log_command_execution(
        &self,
        program: &str,
        subcommand: &str,
        args: &[String],
        allowed: bool,
        reason: Option<String>,
    ) -> Result<()> {
        let level = if allowed {
            AuditLevel::Info
        } else {
            AuditLevel::Warning
        };

        self.log(
            level,
            AuditEventType::CommandExecution {
                program: program.to_string(),
                subcommand: subcommand.to_string(),
                args: args.to_vec(),
                allowed,
                reason,
            },
        )
        .await
    }

    /// Record a security validation result
    pub async fn log_validation(
        &self,
        validation_type: &str,
        target: &str,
        passed: bool,
        details: Option<String>,
    ) -> Result<()> {
        let level = if passed {
            AuditLevel::Info
        } else {
            AuditLevel::Warning
        };

        self.log(
            level,
            AuditEventType::SecurityValidation {
                validation_type: validation_type.to_string(),
                target: target.to_string(),
                passed,
                details,
            },
        )
        .await
    }
}

static AUDIT_LOGGER: once_cell::sync::OnceCell<Arc<AuditLogger>> = once_cell::sync::OnceCell::new();

/// Install the process-wide audit logger. Later calls are ignored once one
/// is installed.
pub fn init_audit_logger(config: AuditConfig) -> Result<()> {
    let logger = Arc::new(AuditLogger::new(config)?);
    let _ = AUDIT_LOGGER.set(logger);
    Ok(())
}

/// The process-wide audit logger, if one has been installed
#[must_use]
pub fn audit_logger() -> Option<Arc<AuditLogger>> {
    AUDIT_LOGGER.get().cloned()
}
