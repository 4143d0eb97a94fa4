//! Workspace-wide constants

use std::time::Duration;

/// Default timeout applied to external program executions
pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum bytes captured from each of stdout and stderr; output beyond
/// this is truncated with [`OUTPUT_TRUNCATION_MARKER`] appended
pub const MAX_CAPTURED_OUTPUT_BYTES: usize = 1024 * 1024;

/// Marker appended to captured output that hit the size cap
pub const OUTPUT_TRUNCATION_MARKER: &str = "\n[output truncated]";

/// Default time-to-live for memoized execution results
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default number of memoized results retained before LRU eviction
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Upper bound a coalesced caller waits for the in-flight execution before
/// giving up; generous relative to any per-request timeout
pub const COALESCE_WAIT_TIMEOUT: Duration = Duration::from_secs(120);
