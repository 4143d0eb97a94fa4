//! PowerShell argument escaping

/// Escape one argument for PowerShell.
///
/// Uses single-quoted literal strings: inside them PowerShell performs no
/// variable expansion, subexpression evaluation, or backtick escaping, so
/// the only character needing treatment is the single quote itself, which
/// is doubled.
#[must_use]
pub fn escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if !needs_quoting(s) {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', "''"))
}

fn needs_quoting(s: &str) -> bool {
    s.chars().any(|c| {
        c.is_whitespace()
            || matches!(
                c,
                '&' | '<'
                    | '>'
                    | '|'
                    | ';'
                    | '`'
                    | '$'
                    | '@'
                    | '"'
                    | '\''
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '{'
                    | '}'
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("--limit=30"), "--limit=30");
    }

    #[test]
    fn test_escape_quoting() {
        assert_eq!(escape(""), "''");
        assert_eq!(escape("hello world"), "'hello world'");
        assert_eq!(escape("$env:PATH"), "'$env:PATH'");
        assert_eq!(escape("`whoami`"), "'`whoami`'");
        assert_eq!(escape("a;b"), "'a;b'");
        assert_eq!(escape("it's"), "'it''s'");
        assert_eq!(escape("@(1,2)"), "'@(1,2)'");
        assert_eq!(escape("{block}"), "'{block}'");
        assert_eq!(escape("[type]"), "'[type]'");
        assert_eq!(escape("$(Get-Content /etc/passwd)"), "'$(Get-Content /etc/passwd)'");
    }
}
