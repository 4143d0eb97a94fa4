//! Round-trip escaping tests against a real POSIX shell
//!
//! Each hostile string is escaped, rendered into a `printf` command line,
//! and run through /bin/sh. The shell must hand the original bytes back
//! with no expansion, substitution, or word-splitting.

#![cfg(unix)]

use codescout_shell::ShellDescriptor;
use std::process::Command;

fn round_trip(value: &str) -> String {
    let descriptor = ShellDescriptor::resolve("linux", None);
    let command_line = descriptor.render_command_line(&[
        "printf".to_string(),
        "%s".to_string(),
        value.to_string(),
    ]);

    let output = Command::new(&descriptor.executable)
        .args(descriptor.dialect.invocation_args())
        .arg(&command_line)
        .output()
        .expect("spawn sh");
    assert!(output.status.success(), "sh failed for {value:?}");
    String::from_utf8(output.stdout).expect("utf8 output")
}

#[test]
fn test_substitution_attempts_stay_literal() {
    for hostile in [
        "$(cat /etc/passwd)",
        "`whoami`",
        "${HOME}",
        "$HOME",
        "$(touch /tmp/pwned)",
    ] {
        assert_eq!(round_trip(hostile), hostile);
    }
}

#[test]
fn test_metacharacters_stay_literal() {
    for hostile in [
        "a; rm -rf /",
        "a && b || c",
        "a | tee /tmp/x",
        "a > /tmp/x < /tmp/y",
        "hash # not a comment",
        "glob * and ? and [abc]",
        "tilde ~root",
    ] {
        assert_eq!(round_trip(hostile), hostile);
    }
}

#[test]
fn test_quotes_and_whitespace_stay_literal() {
    for hostile in [
        "it's quoted",
        r#"she said "hi""#,
        "'already wrapped'",
        "two  spaces\tand a tab",
        "trailing space ",
        "line one\nline two",
    ] {
        assert_eq!(round_trip(hostile), hostile);
    }
}

#[test]
fn test_plain_tokens_pass_unquoted() {
    for plain in ["repos", "--limit=30", "rust-lang/rust", "a.b:c@d"] {
        assert_eq!(round_trip(plain), plain);
    }
}
