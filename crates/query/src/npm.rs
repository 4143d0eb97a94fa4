//! npm CLI command builders

use crate::builder::{CommandBuilder, FlagStyle};
use codescout_core::{Error, ExecutionRequest, ProgramId, Result};
use codescout_security::SecurityValidator;

// Fixed emission order for `npm search` flags
const NPM_SEARCH_FLAG_ORDER: &[&str] = &["searchlimit", "registry", "json"];

/// Builder for `npm view <package> [field...] --json`
#[derive(Debug, Clone)]
pub struct NpmViewBuilder {
    package: String,
    fields: Vec<String>,
    flag_style: FlagStyle,
}

impl NpmViewBuilder {
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            fields: Vec::new(),
            flag_style: FlagStyle::Joined,
        }
    }

    #[must_use]
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn flag_style(mut self, style: FlagStyle) -> Self {
        self.flag_style = style;
        self
    }

    #[must_use]
    pub fn operation(&self) -> &'static str {
        "npm_view"
    }

    /// Emit the request. Package names and field selectors are validated
    /// like list elements so a hostile value cannot become a new flag.
    pub fn build(self) -> Result<ExecutionRequest> {
        if self.package.is_empty() {
            return Err(Error::security("package name cannot be empty".to_string()));
        }
        SecurityValidator::validate_list_element(&self.package, &[])?;
        for field in &self.fields {
            SecurityValidator::validate_list_element(field, &[])?;
        }

        let mut builder = CommandBuilder::new(ProgramId::Npm, "view", self.flag_style)
            .positional(self.package);
        for field in &self.fields {
            builder = builder.positional(field.clone());
        }
        Ok(builder.switch("json").build())
    }
}

/// Builder for `npm search <terms> --searchlimit=N --json`
#[derive(Debug, Clone)]
pub struct NpmSearchBuilder {
    terms: Vec<String>,
    limit: Option<u32>,
    registry: Option<String>,
    flag_style: FlagStyle,
}

impl NpmSearchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
            limit: None,
            registry: None,
            flag_style: FlagStyle::Joined,
        }
    }

    #[must_use]
    pub fn terms(mut self, terms: Vec<String>) -> Self {
        self.terms = terms;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    #[must_use]
    pub fn flag_style(mut self, style: FlagStyle) -> Self {
        self.flag_style = style;
        self
    }

    #[must_use]
    pub fn operation(&self) -> &'static str {
        "npm_search"
    }

    /// Emit the request; flags follow [`NPM_SEARCH_FLAG_ORDER`]
    pub fn build(self) -> Result<ExecutionRequest> {
        if self.terms.is_empty() {
            return Err(Error::configuration(
                "npm search requires at least one term".to_string(),
            ));
        }
        for term in &self.terms {
            SecurityValidator::validate_list_element(term, &[])?;
        }

        let mut builder = CommandBuilder::new(ProgramId::Npm, "search", self.flag_style);
        for term in &self.terms {
            builder = builder.positional(term.clone());
        }

        for flag in NPM_SEARCH_FLAG_ORDER {
            builder = match *flag {
                "searchlimit" => builder.opt_flag("searchlimit", self.limit.map(|n| n.to_string())),
                "registry" => builder.opt_flag("registry", self.registry.clone()),
                "json" => builder.switch("json"),
                _ => builder,
            };
        }

        Ok(builder.build())
    }
}

impl Default for NpmSearchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `npm ping`
#[must_use]
pub fn ping() -> ExecutionRequest {
    CommandBuilder::new(ProgramId::Npm, "ping", FlagStyle::Joined).build()
}

/// `npm config get registry`
#[must_use]
pub fn registry_config() -> ExecutionRequest {
    CommandBuilder::new(ProgramId::Npm, "config", FlagStyle::Joined)
        .positional("get")
        .positional("registry")
        .build()
}

/// `npm whoami`
#[must_use]
pub fn whoami() -> ExecutionRequest {
    CommandBuilder::new(ProgramId::Npm, "whoami", FlagStyle::Joined).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_view_with_fields() {
        let request = NpmViewBuilder::new("react")
            .fields(vec!["version".to_string(), "dependencies".to_string()])
            .build()
            .expect("request");

        assert_eq!(request.subcommand, "view");
        assert_eq!(
            request.args.as_slice(),
            &[
                "react".to_string(),
                "version".to_string(),
                "dependencies".to_string(),
                "--json".to_string(),
            ]
        );
    }

    #[test]
    fn test_view_scoped_package() {
        let request = NpmViewBuilder::new("@types/node").build().expect("request");
        assert_eq!(
            request.args.as_slice(),
            &["@types/node".to_string(), "--json".to_string()]
        );
    }

    #[test]
    fn test_view_rejects_hostile_package_names() {
        assert!(NpmViewBuilder::new("react; rm -rf /").build().is_err());
        assert!(NpmViewBuilder::new("$(whoami)").build().is_err());
        assert!(NpmViewBuilder::new("--registry=https://evil.example").build().is_err());
        assert!(NpmViewBuilder::new("").build().is_err());
    }

    #[test]
    fn test_search_flag_order() {
        let request = NpmSearchBuilder::new()
            .terms(vec!["http".to_string(), "client".to_string()])
            .limit(20)
            .build()
            .expect("request");

        assert_eq!(
            request.args.as_slice(),
            &[
                "http".to_string(),
                "client".to_string(),
                "--searchlimit=20".to_string(),
                "--json".to_string(),
            ]
        );
    }

    #[test]
    fn test_search_requires_terms() {
        assert!(NpmSearchBuilder::new().build().is_err());
    }

    #[test]
    fn test_simple_requests() {
        assert_eq!(ping().subcommand, "ping");
        assert!(ping().args.is_empty());

        let request = registry_config();
        assert_eq!(request.subcommand, "config");
        assert_eq!(
            request.args.as_slice(),
            &["get".to_string(), "registry".to_string()]
        );

        assert_eq!(whoami().subcommand, "whoami");
    }
}
