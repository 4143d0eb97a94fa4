//! Bounded execution of allowlisted external commands
//!
//! Every invocation of a wrapped program flows through one path: binary
//! resolution, the allowlist and argument gates, shell escaping, a
//! timeout-bounded spawn with a composed environment, output capping, and
//! diagnostic classification. The [`ExecutionService`] adds single-flight
//! caching on top, and [`attempt_with_fallback`] layers retry policy
//! above the core without touching it.

pub mod binary;
pub mod diagnostics;
pub mod executor;
pub mod service;

pub use binary::resolve_binary;
pub use diagnostics::{classify, is_benign};
pub use executor::{CommandRunner, ProcessExecutor};
pub use service::{attempt_with_fallback, ExecutionService};
