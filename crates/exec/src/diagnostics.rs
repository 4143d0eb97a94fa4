//! Diagnostic-stream classification
//!
//! The wrapped programs routinely write benign informational text to
//! stderr (update notices, deprecation warnings). A run counts as a
//! diagnostic error only when stderr carries something outside the
//! program's known-benign patterns. The patterns are static configuration
//! tables, never inferred from observed output.

use codescout_core::{Outcome, ProgramId};
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static GH_BENIGN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)a new release of gh is available",
        r"(?i)to upgrade, run",
        r"(?i)^notice:",
        r"(?i)deprecat",
        r"(?i)logged in to github\.com",
        r"(?i)^welcome to github cli",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

#[allow(clippy::expect_used)]
static NPM_BENIGN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^npm warn",
        r"(?i)^npm notice",
        r"(?i)^warning:",
        r"(?i)deprecated",
        r"(?i)ebadengine",
        r"(?i)new .*version of npm available",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

fn benign_patterns(program: ProgramId) -> &'static [Regex] {
    match program {
        ProgramId::Gh => &GH_BENIGN_PATTERNS,
        ProgramId::Npm => &NPM_BENIGN_PATTERNS,
    }
}

/// Whether every non-empty stderr line matches a known-benign pattern
#[must_use]
pub fn is_benign(program: ProgramId, stderr: &str) -> bool {
    stderr
        .lines()
        .filter(|line| !line.trim().is_empty())
        .all(|line| benign_patterns(program).iter().any(|p| p.is_match(line)))
}

/// Classify a completed (non-timeout) execution
#[must_use]
pub fn classify(program: ProgramId, exit_success: bool, stderr: &str) -> Outcome {
    if !exit_success {
        return Outcome::DiagnosticError;
    }

    if stderr.trim().is_empty() || is_benign(program, stderr) {
        Outcome::Success
    } else {
        Outcome::DiagnosticError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stderr_is_success() {
        assert_eq!(classify(ProgramId::Gh, true, ""), Outcome::Success);
        assert_eq!(classify(ProgramId::Npm, true, "  \n"), Outcome::Success);
    }

    #[test]
    fn test_benign_gh_notices_are_advisory() {
        let stderr = "A new release of gh is available: 2.40.0 -> 2.42.0\nTo upgrade, run: brew upgrade gh\n";
        assert_eq!(classify(ProgramId::Gh, true, stderr), Outcome::Success);
    }

    #[test]
    fn test_benign_npm_warnings_are_advisory() {
        let stderr = "npm warn deprecated request@2.88.2: request has been deprecated\nnpm notice New minor version of npm available!\n";
        assert_eq!(classify(ProgramId::Npm, true, stderr), Outcome::Success);
    }

    #[test]
    fn test_real_errors_are_diagnostic_errors() {
        let stderr = "gh: Not Found (HTTP 404)";
        assert_eq!(classify(ProgramId::Gh, true, stderr), Outcome::DiagnosticError);

        let stderr = "npm error code E404\nnpm error 404 Not Found";
        assert_eq!(classify(ProgramId::Npm, true, stderr), Outcome::DiagnosticError);
    }

    #[test]
    fn test_mixed_output_is_a_diagnostic_error() {
        // One benign line plus one real error line
        let stderr = "npm warn deprecated left-pad@1.0.0\nnpm error network request failed";
        assert_eq!(classify(ProgramId::Npm, true, stderr), Outcome::DiagnosticError);
    }

    #[test]
    fn test_nonzero_exit_is_never_success() {
        assert_eq!(classify(ProgramId::Gh, false, ""), Outcome::DiagnosticError);
    }

    #[test]
    fn test_patterns_are_per_program() {
        // npm's benign prefix means nothing to gh
        let stderr = "npm warn something";
        assert!(is_benign(ProgramId::Npm, stderr));
        assert!(!is_benign(ProgramId::Gh, stderr));
    }
}
