//! GitHub CLI (`gh`) command builders

use crate::builder::{CommandBuilder, FlagStyle, SearchQuery};
use codescout_core::{Error, ExecutionRequest, ProgramId, Result};
use codescout_security::SecurityValidator;

/// Which `gh search` domain to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubSearchKind {
    Code,
    Issues,
    PullRequests,
    Repositories,
}

impl GithubSearchKind {
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            GithubSearchKind::Code => "code",
            GithubSearchKind::Issues => "issues",
            GithubSearchKind::PullRequests => "prs",
            GithubSearchKind::Repositories => "repos",
        }
    }

    /// Operation name used for cache key derivation
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            GithubSearchKind::Code => "github_search_code",
            GithubSearchKind::Issues => "github_search_issues",
            GithubSearchKind::PullRequests => "github_search_prs",
            GithubSearchKind::Repositories => "github_search_repos",
        }
    }
}

// Fixed emission order for `gh search` flags; the builder walks this
// table, so caller-side parameter ordering never leaks into the argument
// vector: repo/owner filters, then limit, sort, order, json.
const GH_SEARCH_FLAG_ORDER: &[&str] = &["repo", "limit", "sort", "order", "json"];

/// Builder for `gh search <kind> <query> [flags]`
#[derive(Debug, Clone)]
pub struct GithubSearchBuilder {
    kind: GithubSearchKind,
    query: SearchQuery,
    owners: Vec<String>,
    repos: Vec<String>,
    limit: Option<u32>,
    sort: Option<String>,
    order: Option<String>,
    json_fields: Vec<String>,
    flag_style: FlagStyle,
}

impl GithubSearchBuilder {
    #[must_use]
    pub fn new(kind: GithubSearchKind) -> Self {
        Self {
            kind,
            query: SearchQuery::new(),
            owners: Vec::new(),
            repos: Vec::new(),
            limit: None,
            sort: None,
            order: None,
            json_fields: Vec::new(),
            flag_style: FlagStyle::Joined,
        }
    }

    #[must_use]
    pub fn flag_style(mut self, style: FlagStyle) -> Self {
        self.flag_style = style;
        self
    }

    #[must_use]
    pub fn and_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = self.query.and_terms(terms);
        self
    }

    #[must_use]
    pub fn or_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = self.query.or_terms(terms);
        self
    }

    #[must_use]
    pub fn qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query = self.query.qualifier(key, value);
        self
    }

    #[must_use]
    pub fn owners(mut self, owners: Vec<String>) -> Self {
        self.owners = owners;
        self
    }

    #[must_use]
    pub fn repos(mut self, repos: Vec<String>) -> Self {
        self.repos = repos;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn json_fields(mut self, fields: Vec<String>) -> Self {
        self.json_fields = fields;
        self
    }

    /// Operation name for cache key derivation
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.kind.operation()
    }

    /// Emit the request; flags follow [`GH_SEARCH_FLAG_ORDER`]
    #[must_use]
    pub fn build(self) -> ExecutionRequest {
        let mut builder = CommandBuilder::new(ProgramId::Gh, "search", self.flag_style)
            .positional(self.kind.token())
            .query(&self.query);

        for flag in GH_SEARCH_FLAG_ORDER {
            builder = match *flag {
                "repo" => builder.owner_repo_pairs(&self.owners, &self.repos),
                "limit" => builder.opt_flag("limit", self.limit.map(|n| n.to_string())),
                "sort" => builder.opt_flag("sort", self.sort.clone()),
                "order" => builder.opt_flag("order", self.order.clone()),
                "json" => builder.json_fields(&self.json_fields),
                _ => builder,
            };
        }

        builder.build()
    }
}

/// Builder for `gh api <path>` requests
#[derive(Debug, Clone)]
pub struct GithubApiBuilder {
    path: String,
    jq_filter: Option<String>,
    flag_style: FlagStyle,
}

impl GithubApiBuilder {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            jq_filter: None,
            flag_style: FlagStyle::Joined,
        }
    }

    #[must_use]
    pub fn jq_filter(mut self, filter: impl Into<String>) -> Self {
        self.jq_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn flag_style(mut self, style: FlagStyle) -> Self {
        self.flag_style = style;
        self
    }

    /// Emit the request. The API path is validated like a list element:
    /// no shell metacharacters and no flag-like leading dash.
    pub fn build(self) -> Result<ExecutionRequest> {
        if self.path.is_empty() {
            return Err(Error::security("API path cannot be empty".to_string()));
        }
        SecurityValidator::validate_list_element(&self.path, &[])?;

        let mut builder = CommandBuilder::new(ProgramId::Gh, "api", self.flag_style)
            .positional(self.path);
        if let Some(filter) = self.jq_filter {
            builder = builder.flag("jq", filter);
        }
        Ok(builder.build())
    }
}

/// `gh org list --limit N`
#[must_use]
pub fn org_list(limit: Option<u32>) -> ExecutionRequest {
    CommandBuilder::new(ProgramId::Gh, "org", FlagStyle::Joined)
        .positional("list")
        .opt_flag("limit", limit.map(|n| n.to_string()))
        .build()
}

/// `gh auth status`
#[must_use]
pub fn auth_status() -> ExecutionRequest {
    CommandBuilder::new(ProgramId::Gh, "auth", FlagStyle::Joined)
        .positional("status")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_issues_full_request() {
        let request = GithubSearchBuilder::new(GithubSearchKind::Issues)
            .and_terms(["memory", "leak"])
            .qualifier("label", "bug")
            .owners(vec!["rust-lang".to_string()])
            .repos(vec!["rust".to_string()])
            .limit(30)
            .sort("updated")
            .order("desc")
            .json_fields(vec!["title".to_string(), "url".to_string()])
            .build();

        assert_eq!(request.subcommand, "search");
        assert_eq!(
            request.args.as_slice(),
            &[
                "issues".to_string(),
                "memory leak label:bug".to_string(),
                "--repo=rust-lang/rust".to_string(),
                "--limit=30".to_string(),
                "--sort=updated".to_string(),
                "--order=desc".to_string(),
                "--json=title,url".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let build = || {
            GithubSearchBuilder::new(GithubSearchKind::Repositories)
                .and_terms(["cli"])
                .qualifier("language", "rust")
                .qualifier("stars", ">100")
                .limit(10)
                .build()
        };
        assert_eq!(build().args, build().args);
    }

    #[test]
    fn test_separate_flag_style() {
        let request = GithubSearchBuilder::new(GithubSearchKind::Code)
            .and_terms(["tokio::spawn"])
            .limit(5)
            .flag_style(FlagStyle::Separate)
            .build();
        assert_eq!(
            request.args.as_slice(),
            &[
                "code".to_string(),
                "tokio::spawn".to_string(),
                "--limit".to_string(),
                "5".to_string(),
            ]
        );
    }

    #[test]
    fn test_api_path_validation() {
        assert!(GithubApiBuilder::new("repos/rust-lang/rust/readme").build().is_ok());
        assert!(GithubApiBuilder::new("repos/a; rm -rf /").build().is_err());
        assert!(GithubApiBuilder::new("-x").build().is_err());
        assert!(GithubApiBuilder::new("").build().is_err());
    }

    #[test]
    fn test_org_list_and_auth_status() {
        let request = org_list(Some(50));
        assert_eq!(request.subcommand, "org");
        assert_eq!(
            request.args.as_slice(),
            &["list".to_string(), "--limit=50".to_string()]
        );

        let request = auth_status();
        assert_eq!(request.subcommand, "auth");
        assert_eq!(request.args.as_slice(), &["status".to_string()]);
    }
}
