//! Explicit per-program subcommand allowlists
//!
//! The allowlist is the primary injection defense: it gates every request
//! strictly before any process is spawned, independently of argument
//! escaping. It is data injected at construction, never inferred from
//! input.

use codescout_core::{Error, ProgramId, Result};
use std::collections::{HashMap, HashSet};

/// Immutable enumeration of permitted first-level subcommands per program
#[derive(Debug, Clone, Default)]
pub struct CommandAllowlist {
    programs: HashMap<ProgramId, HashSet<String>>,
}

impl CommandAllowlist {
    /// Create an empty allowlist; every validation fails until programs
    /// are registered
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program with its permitted subcommands
    #[must_use]
    pub fn with_program<I, S>(mut self, program: ProgramId, subcommands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.programs
            .entry(program)
            .or_default()
            .extend(subcommands.into_iter().map(Into::into));
        self
    }

    /// The standard configuration for the wrapped programs
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_program(ProgramId::Gh, ["search", "api", "auth", "org"])
            .with_program(
                ProgramId::Npm,
                ["view", "search", "ping", "config", "whoami"],
            )
    }

    /// Validate a subcommand against the configured set.
    ///
    /// An unregistered program or an empty set denies everything; a
    /// subcommand carrying whitespace or shell metacharacters is rejected
    /// even if its first word would match.
    pub fn validate(&self, program: ProgramId, subcommand: &str) -> Result<()> {
        let permitted = self.programs.get(&program).ok_or_else(|| {
            Error::security(format!(
                "command execution denied: no subcommands are allowed for '{program}'"
            ))
        })?;

        if permitted.is_empty() {
            return Err(Error::security(format!(
                "command execution denied: no subcommands are allowed for '{program}'"
            )));
        }

        if subcommand.is_empty()
            || subcommand.chars().any(|c| {
                c.is_whitespace() || matches!(c, ';' | '|' | '&' | '`' | '$' | '<' | '>' | '\0')
            })
        {
            return Err(Error::security(format!(
                "command execution denied: malformed subcommand for '{program}': '{subcommand}'"
            )));
        }

        if !permitted.contains(subcommand) {
            return Err(Error::security(format!(
                "command execution denied: '{program} {subcommand}' is not in the allowed subcommand list"
            )));
        }

        Ok(())
    }

    /// Permitted subcommands for a program, if registered
    #[must_use]
    pub fn permitted(&self, program: ProgramId) -> Option<&HashSet<String>> {
        self.programs.get(&program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_allowlist_accepts_registered_subcommands() {
        let allowlist = CommandAllowlist::standard();
        assert!(allowlist.validate(ProgramId::Gh, "search").is_ok());
        assert!(allowlist.validate(ProgramId::Gh, "api").is_ok());
        assert!(allowlist.validate(ProgramId::Npm, "view").is_ok());
        assert!(allowlist.validate(ProgramId::Npm, "whoami").is_ok());
    }

    #[test]
    fn test_unregistered_subcommand_is_denied() {
        let allowlist = CommandAllowlist::standard();
        for sub in ["rm", "install", "exec", "repo", "run"] {
            let err = allowlist.validate(ProgramId::Gh, sub).unwrap_err();
            assert!(err.is_security(), "{sub} should be denied");
        }
    }

    #[test]
    fn test_malformed_subcommand_is_denied_even_with_allowed_prefix() {
        let allowlist = CommandAllowlist::standard();
        for sub in ["rm -rf /", "search; rm -rf /", "search|cat", "search\0", ""] {
            assert!(
                allowlist.validate(ProgramId::Gh, sub).is_err(),
                "{sub:?} should be denied"
            );
        }
    }

    #[test]
    fn test_empty_allowlist_denies_everything() {
        let allowlist = CommandAllowlist::new();
        assert!(allowlist.validate(ProgramId::Gh, "search").is_err());

        let allowlist = CommandAllowlist::new().with_program(ProgramId::Gh, Vec::<String>::new());
        assert!(allowlist.validate(ProgramId::Gh, "search").is_err());
    }

    #[test]
    fn test_independent_configurations_do_not_share_state() {
        let base = CommandAllowlist::new().with_program(ProgramId::Gh, ["search"]);
        let extended = base.clone().with_program(ProgramId::Gh, ["api"]);

        assert!(base.validate(ProgramId::Gh, "api").is_err());
        assert!(extended.validate(ProgramId::Gh, "api").is_ok());
    }
}
