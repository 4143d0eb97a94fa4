//! Wrapped-program binary resolution
//!
//! A program's binary may be overridden through its environment variable,
//! but only with an absolute path that verifies as an executable file.
//! Relative or unverified paths are rejected before use, so the override
//! can never re-enter PATH search (on Windows that search can include the
//! current directory).

use codescout_core::{Error, ProgramId, Result};
use std::path::Path;

/// Resolve the binary name or verified override path for a program
pub fn resolve_binary(program: ProgramId) -> Result<String> {
    match std::env::var(program.path_override_var()) {
        Ok(override_path) if !override_path.trim().is_empty() => {
            validate_override(program, &override_path)?;
            Ok(override_path)
        }
        _ => Ok(program.binary_name().to_string()),
    }
}

fn validate_override(program: ProgramId, override_path: &str) -> Result<()> {
    let path = Path::new(override_path);

    if !path.is_absolute() {
        return Err(Error::security(format!(
            "{} must be an absolute path, got '{override_path}'",
            program.path_override_var()
        )));
    }

    // `which` on an absolute path verifies it is an existing executable
    // file without performing any PATH search
    which::which(path).map_err(|e| {
        Error::security(format!(
            "{} does not point to an executable: {e}",
            program.path_override_var()
        ))
    })?;

    Ok(())
}
