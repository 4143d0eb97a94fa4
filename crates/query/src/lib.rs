//! Deterministic command and search-query builders
//!
//! This crate turns structured, possibly attacker-influenced parameters
//! into ordered argument vectors: AND/OR term composition,
//! qualifier-conflict resolution, array-parameter normalization, and the
//! `gh`/npm command specializations. Emission is byte-deterministic for a
//! fixed logical parameter set.

pub mod builder;
pub mod github;
pub mod normalize;
pub mod npm;

pub use builder::{CommandBuilder, FlagStyle, SearchQuery};
pub use github::{GithubApiBuilder, GithubSearchBuilder, GithubSearchKind};
pub use normalize::{normalize_optional_list, normalize_string_list};
pub use npm::{NpmSearchBuilder, NpmViewBuilder};
