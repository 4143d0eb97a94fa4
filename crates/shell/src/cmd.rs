//! `cmd.exe` argument escaping

/// Escape one argument for `cmd.exe`.
///
/// Arguments containing whitespace or any of `&<>|^"` are wrapped in
/// double quotes, with embedded double quotes doubled. CMD has no literal
/// quoting construct, so this covers the metacharacters it word-splits or
/// interprets inside an unquoted token.
#[must_use]
pub fn escape(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }

    if !needs_quoting(s) {
        return s.to_string();
    }

    format!("\"{}\"", s.replace('"', "\"\""))
}

fn needs_quoting(s: &str) -> bool {
    s.chars()
        .any(|c| c.is_whitespace() || matches!(c, '&' | '<' | '>' | '|' | '^' | '"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("--limit=30"), "--limit=30");
        assert_eq!(escape("C:/Users/dev"), "C:/Users/dev");
    }

    #[test]
    fn test_escape_quoting() {
        assert_eq!(escape(""), "\"\"");
        assert_eq!(escape("hello world"), "\"hello world\"");
        assert_eq!(escape("a&b"), "\"a&b\"");
        assert_eq!(escape("a|b"), "\"a|b\"");
        assert_eq!(escape("a>b<c"), "\"a>b<c\"");
        assert_eq!(escape("a^b"), "\"a^b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("tab\there"), "\"tab\there\"");
    }
}
