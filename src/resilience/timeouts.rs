//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap routing store calls with a deadline
//! - Cancel the pending call cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A timed-out call is reported as `StoreError::Timeout`, which callers
//!   treat like any other store failure
//! - `None` means no deadline

use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::store::StoreError;

/// Convert a configured millisecond deadline into an optional duration.
/// Zero disables the deadline.
pub fn deadline_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Run a store call, failing with [`StoreError::Timeout`] if `limit` elapses first.
pub async fn with_deadline<T, F>(limit: Option<Duration>, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match limit {
        Some(limit) => match time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(limit)),
        },
        None => fut.await,
    }
}
