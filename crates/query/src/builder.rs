//! Composable command and search-query building primitives
//!
//! Builders accumulate raw (unescaped) tokens; escaping happens once, at
//! the process boundary. For a fixed logical parameter set the emitted
//! argument vector is byte-identical on every call: qualifiers are sorted,
//! flag order follows each command's fixed order table, and nothing
//! depends on the insertion order of caller-side maps.

use codescout_core::{CommandArguments, ExecutionRequest, ProgramId};
use std::collections::BTreeMap;

/// How a flag and its value are emitted.
///
/// The convention is an explicit, caller-supplied configuration value per
/// builder construction; it is never inferred from execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagStyle {
    /// `--name=value` as one token
    #[default]
    Joined,
    /// `--name value` as two tokens
    Separate,
}

/// Search-query composition: AND terms, OR terms, and `key:value`
/// qualifiers with conflict resolution
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    and_terms: Vec<String>,
    or_terms: Vec<String>,
    qualifiers: BTreeMap<String, String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn and_term(mut self, term: impl Into<String>) -> Self {
        self.and_terms.push(term.into());
        self
    }

    #[must_use]
    pub fn and_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.and_terms.extend(terms.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn or_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.or_terms.extend(terms.into_iter().map(Into::into));
        self
    }

    /// Set an explicit qualifier. Explicit values win over occurrences of
    /// the same key embedded in free-text terms.
    #[must_use]
    pub fn qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.and_terms.is_empty() && self.or_terms.is_empty() && self.qualifiers.is_empty()
    }

    /// Render the query string: AND terms space-joined, OR terms collapsed
    /// (`0 -> nothing, 1 -> bare, >=2 -> (a OR b)`), then sorted
    /// qualifiers. Embedded `key:value` tokens whose key also has an
    /// explicit qualifier are stripped from the free text first, so the
    /// downstream engine never sees duplicate or contradictory qualifiers.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        for term in &self.and_terms {
            let cleaned = self.strip_shadowed_qualifiers(term);
            if cleaned.is_empty() {
                continue;
            }
            parts.push(quote_term(&cleaned));
        }

        match self.or_terms.len() {
            0 => {}
            1 => parts.push(quote_term(&self.or_terms[0])),
            _ => {
                let joined = self
                    .or_terms
                    .iter()
                    .map(|t| quote_term(t))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                parts.push(format!("({joined})"));
            }
        }

        for (key, value) in &self.qualifiers {
            if value.chars().any(char::is_whitespace) {
                parts.push(format!("{key}:\"{value}\""));
            } else {
                parts.push(format!("{key}:{value}"));
            }
        }

        parts.join(" ")
    }

    fn strip_shadowed_qualifiers(&self, term: &str) -> String {
        term.split_whitespace()
            .filter(|token| {
                !self
                    .qualifiers
                    .keys()
                    .any(|key| token.len() > key.len() && token.starts_with(key.as_str()) && token.as_bytes()[key.len()] == b':')
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote a term when it contains whitespace; phrases become one search
/// word, everything else passes through as-is
fn quote_term(term: &str) -> String {
    if term.chars().any(char::is_whitespace) {
        format!("\"{term}\"")
    } else {
        term.to_string()
    }
}

/// Ordered accumulation of one subcommand invocation
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: ProgramId,
    subcommand: String,
    args: Vec<String>,
    flag_style: FlagStyle,
}

impl CommandBuilder {
    #[must_use]
    pub fn new(program: ProgramId, subcommand: impl Into<String>, flag_style: FlagStyle) -> Self {
        Self {
            program,
            subcommand: subcommand.into(),
            args: Vec::new(),
            flag_style,
        }
    }

    /// Append one positional argument
    #[must_use]
    pub fn positional(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append the rendered form of a search query as one positional
    /// argument; empty queries emit nothing
    #[must_use]
    pub fn query(mut self, query: &SearchQuery) -> Self {
        let rendered = query.render();
        if !rendered.is_empty() {
            self.args.push(rendered);
        }
        self
    }

    /// Append a flag using this builder's configured style
    #[must_use]
    pub fn flag(self, name: &str, value: impl Into<String>) -> Self {
        match self.flag_style {
            FlagStyle::Joined => self.flag_joined(name, value),
            FlagStyle::Separate => self.flag_separate(name, value),
        }
    }

    /// Append `--name=value` as one token
    #[must_use]
    pub fn flag_joined(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push(format!("--{name}={}", value.into()));
        self
    }

    /// Append `--name value` as two tokens; some wrapped programs only
    /// accept this convention
    #[must_use]
    pub fn flag_separate(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push(format!("--{name}"));
        self.args.push(value.into());
        self
    }

    /// Append a bare `--name` switch
    #[must_use]
    pub fn switch(mut self, name: &str) -> Self {
        self.args.push(format!("--{name}"));
        self
    }

    /// Append an optional flag; `None` emits nothing
    #[must_use]
    pub fn opt_flag(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.flag(name, v),
            None => self,
        }
    }

    /// Emit one `repo` flag per owner×repo combination.
    ///
    /// Repos that already carry an embedded `/` are fully qualified and
    /// pass through unchanged; owners without any repos emit `owner`
    /// flags instead. Duplicate tokens are dropped, first occurrence wins.
    #[must_use]
    pub fn owner_repo_pairs(mut self, owners: &[String], repos: &[String]) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        let mut push_unique = |token: String, tokens: &mut Vec<String>| {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        };

        if repos.is_empty() {
            for owner in owners {
                push_unique(owner.clone(), &mut tokens);
            }
            for owner in tokens {
                self = self.flag("owner", owner);
            }
            return self;
        }

        for repo in repos {
            if repo.contains('/') {
                push_unique(repo.clone(), &mut tokens);
            } else if owners.is_empty() {
                push_unique(repo.clone(), &mut tokens);
            } else {
                for owner in owners {
                    push_unique(format!("{owner}/{repo}"), &mut tokens);
                }
            }
        }

        for token in tokens {
            self = self.flag("repo", token);
        }
        self
    }

    /// Append a `--json` field selector; empty selections emit nothing
    #[must_use]
    pub fn json_fields(self, fields: &[String]) -> Self {
        if fields.is_empty() {
            self
        } else {
            self.flag("json", fields.join(","))
        }
    }

    /// Finish building: the validated-subcommand/argument pair
    #[must_use]
    pub fn build(self) -> ExecutionRequest {
        ExecutionRequest::new(self.program, self.subcommand)
            .with_args(CommandArguments::from_vec(self.args))
    }
}
