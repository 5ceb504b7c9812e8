// Transaction timeout protection
use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::service::error::ServiceError;

pub struct QueryTimeout;

impl QueryTimeout {
    /// Runs one store operation, failing with `Timeout` once `limit` passes.
    /// The future is dropped on expiry, which rolls back any open transaction.
    pub async fn run<F, T>(limit: Duration, operation: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        match timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("store operation timed out after {:?}", limit);
                Err(ServiceError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_results_through() {
        let value = QueryTimeout::run(Duration::from_secs(1), async { Ok::<_, ServiceError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn slow_operations_time_out() {
        let result = QueryTimeout::run(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, ServiceError>(())
        })
        .await;
        assert!(matches!(result, Err(ServiceError::Timeout)));
    }
}
