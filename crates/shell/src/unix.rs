//! POSIX `sh` argument escaping

/// Escape one argument for a POSIX shell.
///
/// Arguments made up entirely of the safe set `[A-Za-z0-9._/:=@-]` pass
/// through unchanged for readability. Everything else is wrapped in single
/// quotes, with embedded single quotes encoded as close-quote,
/// escaped-quote, reopen-quote (`'\''`).
#[must_use]
pub fn escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars().all(is_safe_char) {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 10);
    result.push('\'');

    for c in s.chars() {
        if c == '\'' {
            result.push_str("'\\''");
        } else {
            result.push(c);
        }
    }

    result.push('\'');
    result
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | ':' | '=' | '@' | '-')
}
