use std::path::PathBuf;

/// Result type alias for codescout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for codescout operations
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    /// Security validation errors (disallowed subcommands, injection attempts)
    #[error("security validation error: {message}")]
    #[diagnostic(code(codescout::security))]
    Security { message: String },

    /// Command execution errors
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    #[diagnostic(code(codescout::command_execution))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    #[diagnostic(code(codescout::configuration))]
    Configuration { message: String },

    /// Operation timeout errors
    #[error("operation '{operation}' timed out after {duration:?}")]
    #[diagnostic(code(codescout::timeout))]
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{}': {source}", .path.display())]
    #[diagnostic(code(codescout::file_system))]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    #[diagnostic(code(codescout::json))]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    match exit_code {
        Some(code) => {
            if args_str.is_empty() {
                format!("command '{command}' failed with exit code {code}: {message}")
            } else {
                format!("command '{command} {args_str}' failed with exit code {code}: {message}")
            }
        }
        None => {
            if args_str.is_empty() {
                format!("command '{command}' failed: {message}")
            } else {
                format!("command '{command} {args_str}' failed: {message}")
            }
        }
    }
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Configuration {
            message: format!("An internal error occurred: {error}"),
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a security validation error
    #[must_use]
    pub fn security(message: impl Into<String>) -> Self {
        Error::Security {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: std::time::Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error came from a security validation check
    #[must_use]
    pub fn is_security(&self) -> bool {
        matches!(self, Error::Security { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_formatting() {
        let err = Error::command_execution(
            "gh",
            vec!["search".to_string(), "issues".to_string()],
            "boom",
            Some(1),
        );
        assert_eq!(
            err.to_string(),
            "command 'gh search issues' failed with exit code 1: boom"
        );

        let err = Error::command_execution("npm", vec![], "not found", None);
        assert_eq!(err.to_string(), "command 'npm' failed: not found");
    }

    #[test]
    fn test_security_error_display() {
        let err = Error::security("subcommand 'rm' is not allowed");
        assert!(err.is_security());
        assert_eq!(
            err.to_string(),
            "security validation error: subcommand 'rm' is not allowed"
        );
    }
}
