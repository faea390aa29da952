//! Retry of queries that failed on a dropped or busy connection

use std::future::Future;
use std::io::ErrorKind;
use std::time::Duration;

/// Wait before the single retry
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Run a query, run it once more when it failed with a transient error
///
/// Only used for reads and partial updates, which give the same row when run twice. Inserts and
/// deletes would report a conflict or a missing row on the second run
pub async fn with_retry<T, F, Fut>(query: F) -> Result<T, sqlx::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match query().await {
        Err(err) if is_transient(&err) => {
            tracing::warn!("Transient database error, retrying: {err}");

            tokio::time::sleep(RETRY_DELAY).await;

            query().await
        }
        result => result,
    }
}

/// Connection level failures that might succeed on a fresh connection
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(err) => matches!(
            err.kind(),
            ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::NotFound
                | ErrorKind::TimedOut
                | ErrorKind::BrokenPipe
        ),
        sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn test_is_transient() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(is_transient(&sqlx::Error::Io(std::io::Error::from(
            ErrorKind::ConnectionReset
        ))));

        assert!(!is_transient(&sqlx::Error::RowNotFound));
        assert!(!is_transient(&sqlx::Error::Io(std::io::Error::from(
            ErrorKind::PermissionDenied
        ))));
    }

    #[tokio::test]
    async fn test_with_retry_retries_once() {
        let calls = &AtomicU32::new(0);

        let result: Result<u32, sqlx::Error> = with_retry(|| async move {
            let call = calls.fetch_add(1, Ordering::SeqCst);

            if call == 0 {
                Err(sqlx::Error::PoolTimedOut)
            } else {
                Ok(call)
            }
        })
        .await;

        assert!(matches!(result, Ok(1)));
        assert_eq!(2, calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_on_other_errors() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), sqlx::Error> = with_retry(|| async move {
            calls.fetch_add(1, Ordering::SeqCst);

            Err(sqlx::Error::RowNotFound)
        })
        .await;

        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        assert_eq!(1, calls.load(Ordering::SeqCst));
    }
}
