//! Security features for codescout
//!
//! This crate provides:
//! - Per-program subcommand allowlisting (the primary injection defense)
//! - Argument and array-element injection checks
//! - Audit logging for allowlist decisions and validation events

pub mod allowlist;
pub mod audit;
pub mod validator;

pub use allowlist::CommandAllowlist;
pub use audit::{
    audit_logger, init_audit_logger, AuditConfig, AuditEntry, AuditEventType, AuditLevel,
    AuditLogger,
};
pub use validator::SecurityValidator;
