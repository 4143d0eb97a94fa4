//! Execution service tying the runner, cache, and fallback policy together

use crate::executor::CommandRunner;
use codescout_cache::{cache_key, ResultCache};
use codescout_core::{ExecutionRequest, ExecutionResult, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Cached, coalesced front door for command execution
///
/// Callers derive an operation name and logical parameters from their
/// builder, and the service keys the cache on those rather than on the
/// rendered argument vector.
pub struct ExecutionService {
    runner: Arc<dyn CommandRunner>,
    cache: Arc<ResultCache>,
}

impl ExecutionService {
    pub fn new(runner: Arc<dyn CommandRunner>, cache: Arc<ResultCache>) -> Self {
        Self { runner, cache }
    }

    /// Run a request under the single-flight cache, keyed by `operation`
    /// and the canonicalized `params`
    pub async fn run(
        &self,
        operation: &str,
        params: &Value,
        request: ExecutionRequest,
    ) -> Result<ExecutionResult> {
        let key = cache_key(operation, params);
        let runner = Arc::clone(&self.runner);
        let cache_enabled = request.cache_enabled;

        self.cache
            .get_or_execute(&key, cache_enabled, move || async move {
                runner.execute(&request).await
            })
            .await
    }

    /// Snapshot of the underlying cache counters
    #[must_use]
    pub fn cache_stats(&self) -> codescout_cache::CacheStatSnapshot {
        self.cache.stats()
    }
}

/// Run `primary`, and when it succeeds but `is_empty` judges its payload
/// to hold no results, run the broadened `fallback` attempt.
///
/// The fallback result is returned only when it improves on the primary:
/// a failed or equally empty fallback yields the primary result, keeping
/// the original diagnostics visible. Failed primaries are returned
/// unchanged, never retried.
pub async fn attempt_with_fallback<Fut, P, Fb, FbFut>(
    primary: Fut,
    is_empty: P,
    fallback: Fb,
) -> Result<ExecutionResult>
where
    Fut: Future<Output = Result<ExecutionResult>>,
    P: Fn(&ExecutionResult) -> bool,
    Fb: FnOnce() -> FbFut,
    FbFut: Future<Output = Result<ExecutionResult>>,
{
    let first = primary.await?;
    if !first.outcome.is_success() || !is_empty(&first) {
        return Ok(first);
    }

    tracing::debug!(command = %first.command_line, "empty result, trying broadened fallback");
    match fallback().await {
        Ok(second) if second.outcome.is_success() && !is_empty(&second) => Ok(second),
        _ => Ok(first),
    }
}
