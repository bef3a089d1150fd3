//! Retention sweeping for record storage hygiene
//!
//! Every checked key leaves a record behind; without maintenance the store
//! grows with the number of identities ever seen. The sweeper deletes
//! records whose last check is older than the retention horizon. Retention
//! is a storage concern, not a rate-limit concern — it ignores whether the
//! record's window is still active, and deleting a record that a caller is
//! concurrently re-using is fine because the next check recreates it.

use super::store::Store;
use super::LimitError;
use std::time::{Duration, SystemTime};

/// Batch deletion policy for records past the retention horizon
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    retention: Duration,
    batch_limit: usize,
}

impl RetentionSweeper {
    /// Create a sweeper deleting records untouched for `retention`, at most
    /// `batch_limit` per sweep
    pub fn new(retention: Duration, batch_limit: usize) -> Self {
        RetentionSweeper {
            retention,
            batch_limit,
        }
    }

    /// Delete eligible records from `store`, returning how many went
    ///
    /// Idempotent: once the stale set is gone, further sweeps over the same
    /// data return 0. The sweeper never schedules itself; drive it from a
    /// recurring job.
    pub fn sweep<S: Store>(&self, store: &mut S, now: SystemTime) -> Result<usize, LimitError> {
        // A horizon reaching past the epoch means nothing can qualify
        let Some(cutoff) = now.checked_sub(self.retention) else {
            return Ok(0);
        };

        store
            .remove_older_than(cutoff, self.batch_limit)
            .map_err(LimitError::StoreUnavailable)
    }
}
