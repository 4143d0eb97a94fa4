//! Shell dialect resolution and argument escaping
//!
//! This crate turns a host platform plus an optional preference into a
//! [`ShellDescriptor`], and escapes single arguments so that the target
//! shell parses each token back to exactly the original string with no
//! word-splitting, globbing, expansion, or command substitution.

pub mod cmd;
pub mod pwsh;
pub mod unix;

use serde::{Deserialize, Serialize};

/// The shell syntax family used to quote arguments and run the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellDialect {
    /// POSIX `sh` quoting rules
    Unix,
    /// `cmd.exe` quoting rules
    WindowsCmd,
    /// PowerShell literal-string quoting rules
    PowerShell,
}

impl ShellDialect {
    /// Escape one argument for this dialect
    #[must_use]
    pub fn escape(&self, s: &str) -> String {
        match self {
            ShellDialect::Unix => unix::escape(s),
            ShellDialect::WindowsCmd => cmd::escape(s),
            ShellDialect::PowerShell => pwsh::escape(s),
        }
    }

    /// The shell executable invoked to run a command line; `pwsh` is the
    /// cross-platform PowerShell binary name
    #[must_use]
    pub fn executable(&self) -> &'static str {
        match self {
            ShellDialect::Unix => "/bin/sh",
            ShellDialect::WindowsCmd => "cmd.exe",
            ShellDialect::PowerShell => "pwsh",
        }
    }

    /// Arguments placed before the command-line string when spawning
    #[must_use]
    pub fn invocation_args(&self) -> &'static [&'static str] {
        match self {
            ShellDialect::Unix => &["-c"],
            ShellDialect::WindowsCmd => &["/d", "/s", "/c"],
            ShellDialect::PowerShell => &["-NoProfile", "-Command"],
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ShellDialect::Unix => "unix",
            ShellDialect::WindowsCmd => "cmd",
            ShellDialect::PowerShell => "powershell",
        }
    }
}

/// Explicit shell preference; only meaningful on Windows hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellPreference {
    PowerShell,
    Cmd,
}

/// Resolved shell configuration, derived once per execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellDescriptor {
    pub dialect: ShellDialect,
    pub executable: String,
}

impl ShellDescriptor {
    /// Resolve a descriptor from a platform name (`std::env::consts::OS`)
    /// and an optional preference.
    ///
    /// Non-Windows hosts always resolve to the POSIX dialect; unknown
    /// platforms fall back to it as well. Windows resolves to PowerShell
    /// only when explicitly requested, `cmd.exe` otherwise.
    #[must_use]
    pub fn resolve(platform: &str, preference: Option<ShellPreference>) -> Self {
        let dialect = match platform {
            "windows" => match preference {
                Some(ShellPreference::PowerShell) => ShellDialect::PowerShell,
                _ => ShellDialect::WindowsCmd,
            },
            _ => ShellDialect::Unix,
        };

        Self {
            dialect,
            executable: dialect.executable().to_string(),
        }
    }

    /// Resolve for the current host
    #[must_use]
    pub fn for_host(preference: Option<ShellPreference>) -> Self {
        Self::resolve(std::env::consts::OS, preference)
    }

    /// Join independently escaped tokens into the literal command line
    #[must_use]
    pub fn render_command_line(&self, tokens: &[String]) -> String {
        tokens
            .iter()
            .map(|t| self.dialect.escape(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_non_windows_is_always_unix() {
        for platform in ["linux", "macos", "freebsd", "plan9"] {
            let descriptor = ShellDescriptor::resolve(platform, Some(ShellPreference::PowerShell));
            assert_eq!(descriptor.dialect, ShellDialect::Unix, "{platform}");
        }
    }

    #[test]
    fn test_resolve_windows_defaults_to_cmd() {
        let descriptor = ShellDescriptor::resolve("windows", None);
        assert_eq!(descriptor.dialect, ShellDialect::WindowsCmd);
        assert_eq!(descriptor.executable, "cmd.exe");

        let descriptor = ShellDescriptor::resolve("windows", Some(ShellPreference::Cmd));
        assert_eq!(descriptor.dialect, ShellDialect::WindowsCmd);
    }

    #[test]
    fn test_resolve_windows_powershell_only_when_requested() {
        let descriptor = ShellDescriptor::resolve("windows", Some(ShellPreference::PowerShell));
        assert_eq!(descriptor.dialect, ShellDialect::PowerShell);
        assert_eq!(descriptor.executable, "pwsh");
    }

    #[test]
    fn test_render_command_line_escapes_each_token() {
        let descriptor = ShellDescriptor::resolve("linux", None);
        let tokens = vec![
            "gh".to_string(),
            "search".to_string(),
            "issues".to_string(),
            "$(cat /etc/passwd)".to_string(),
        ];
        assert_eq!(
            descriptor.render_command_line(&tokens),
            "gh search issues '$(cat /etc/passwd)'"
        );
    }
}
