//! Injection checks for arguments and normalized list elements

use codescout_core::{Error, Result};

/// Security module for validating command arguments and user input
pub struct SecurityValidator;

impl SecurityValidator {
    /// Validate command arguments to prevent injection
    ///
    /// These run on the raw argument vector in addition to process-level
    /// escaping; even a bug in the escaper should not let an argument
    /// smuggle command substitution through.
    pub fn validate_command_args(args: &[String]) -> Result<()> {
        for arg in args {
            if arg.contains('\0') {
                return Err(Error::security(
                    "command argument contains null byte".to_string(),
                ));
            }

            if Self::contains_command_substitution(arg) {
                return Err(Error::security(format!(
                    "command argument contains potential command substitution: '{arg}'"
                )));
            }
        }

        Ok(())
    }

    /// Validate one element of a normalized array parameter.
    ///
    /// Array elements become individual CLI tokens, so the checks are
    /// stricter than for free-text query content: any shell metacharacter
    /// is rejected, and a leading dash is rejected unless the element is
    /// explicitly whitelisted as a flag-like value.
    pub fn validate_list_element(element: &str, allowed_flags: &[&str]) -> Result<()> {
        if element.contains('\0') {
            return Err(Error::security(
                "list element contains null byte".to_string(),
            ));
        }

        if element
            .chars()
            .any(|c| matches!(c, ';' | '|' | '&' | '`' | '$' | '<' | '>'))
        {
            return Err(Error::security(format!(
                "list element contains shell metacharacters: '{element}'"
            )));
        }

        if element.starts_with('-') && !allowed_flags.contains(&element) {
            return Err(Error::security(format!(
                "list element looks like a flag and is not whitelisted: '{element}'"
            )));
        }

        Ok(())
    }

    /// Sanitize environment variable names
    pub fn sanitize_env_var_name(name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::security(
                "environment variable name cannot be empty".to_string(),
            ));
        }

        let first_char = name.chars().next().ok_or_else(|| {
            Error::security("environment variable name is unexpectedly empty".to_string())
        })?;
        if !first_char.is_alphabetic() && first_char != '_' {
            return Err(Error::security(format!(
                "environment variable name '{name}' must start with a letter or underscore"
            )));
        }

        for c in name.chars() {
            if !c.is_alphanumeric() && c != '_' {
                return Err(Error::security(format!(
                    "environment variable name '{name}' contains invalid character '{c}'"
                )));
            }
        }

        Ok(name.to_string())
    }

    // Helper methods

    fn contains_command_substitution(value: &str) -> bool {
        value.contains("$(") || value.contains('`') || value.contains("${")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_accepts_plain_arguments() {
        let args: Vec<String> = ["issues", "memory leak", "--limit=30", "label:bug"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(SecurityValidator::validate_command_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_rejects_substitution() {
        for arg in ["$(cat /etc/passwd)", "`whoami`", "${PATH}"] {
            let args = vec![arg.to_string()];
            assert!(
                SecurityValidator::validate_command_args(&args).is_err(),
                "{arg} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_args_rejects_null_bytes() {
        let args = vec!["ab\0cd".to_string()];
        assert!(SecurityValidator::validate_command_args(&args).is_err());
    }

    #[test]
    fn test_list_element_rejects_metacharacters() {
        for element in ["a;b", "a|b", "a&b", "a`b", "a$b", "a<b", "a>b"] {
            assert!(
                SecurityValidator::validate_list_element(element, &[]).is_err(),
                "{element} should be rejected"
            );
        }
    }

    #[test]
    fn test_list_element_flag_injection() {
        assert!(SecurityValidator::validate_list_element("-x", &[]).is_err());
        assert!(SecurityValidator::validate_list_element("--force", &[]).is_err());
        assert!(SecurityValidator::validate_list_element("-x", &["-x"]).is_ok());
        assert!(SecurityValidator::validate_list_element("plain", &[]).is_ok());
    }

    #[test]
    fn test_sanitize_env_var_name() {
        assert!(SecurityValidator::sanitize_env_var_name("GH_TOKEN").is_ok());
        assert!(SecurityValidator::sanitize_env_var_name("_private").is_ok());
        assert!(SecurityValidator::sanitize_env_var_name("1BAD").is_err());
        assert!(SecurityValidator::sanitize_env_var_name("BAD-NAME").is_err());
        assert!(SecurityValidator::sanitize_env_var_name("").is_err());
    }
}
