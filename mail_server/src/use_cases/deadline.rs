use std::future::Future;
use std::time::Duration;

use crate::domain::errors::DispatchError;

// Run one blocking shard call under a deadline.
pub(crate) async fn bounded<T>(
    operation: &'static str,
    limit: Duration,
    call: impl Future<Output = T>,
) -> Result<T, DispatchError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| DispatchError::Timeout {
            operation,
            after_ms: limit.as_millis(),
        })
}
