//! Execution seam between query generation and the database.
//!
//! The flattener only ever sees [`SqlExecutor`]; the ClickHouse-backed
//! implementation lives here too, but callers are free to supply their own
//! (tests mock the trait). Errors are split into transient connection
//! failures, which the DDL retry loop is allowed to absorb, and query
//! failures, which abort immediately.

use async_trait::async_trait;
use clickhouse::Client;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("transient connection failure: {0}")]
    Transient(String),
    #[error("query failed: {0}")]
    Query(String),
}

impl From<clickhouse::error::Error> for ExecutorError {
    fn from(err: clickhouse::error::Error) -> Self {
        use clickhouse::error::Error;
        match &err {
            Error::Network(_) | Error::TimedOut => ExecutorError::Transient(err.to_string()),
            _ => ExecutorError::Query(err.to_string()),
        }
    }
}

/// What the flattener needs from a database connection: statement execution,
/// a count query, an existence probe and a raw formatted read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<(), ExecutorError>;

    async fn fetch_count(&self, sql: &str) -> Result<u64, ExecutorError>;

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, ExecutorError>;

    /// Run a query and return the server-formatted response as text.
    /// `format` is a ClickHouse output format name such as `PrettyCompact`.
    async fn fetch_raw(&self, sql: &str, format: &str) -> Result<String, ExecutorError>;
}

/// [`SqlExecutor`] backed by a ClickHouse client.
pub struct ClickHouseExecutor {
    client: Client,
}

impl ClickHouseExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SqlExecutor for ClickHouseExecutor {
    async fn execute(&self, sql: &str) -> Result<(), ExecutorError> {
        log::debug!("Executing SQL:\n{}", sql);
        self.client.query(sql).execute().await.map_err(ExecutorError::from)
    }

    async fn fetch_count(&self, sql: &str) -> Result<u64, ExecutorError> {
        Ok(self.client.query(sql).fetch_one::<u64>().await?)
    }

    async fn table_exists(&self, database: &str, table: &str) -> Result<bool, ExecutorError> {
        let count = self
            .client
            .query("SELECT count() FROM system.tables WHERE database = ? AND name = ?")
            .bind(database)
            .bind(table)
            .fetch_one::<u64>()
            .await?;
        Ok(count > 0)
    }

    async fn fetch_raw(&self, sql: &str, format: &str) -> Result<String, ExecutorError> {
        let mut lines = self.client.query(sql).fetch_bytes(format)?.lines();
        let mut rows: Vec<String> = vec![];
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| ExecutorError::Transient(e.to_string()))?
        {
            rows.push(line);
        }
        Ok(rows.join("\n"))
    }
}

/// Number of attempts for statements wrapped in [`execute_with_retry`].
const MAX_ATTEMPTS: u32 = 3;

/// Run a statement, absorbing transient connection failures with a bounded
/// retry loop and exponential backoff. Query errors are never retried. On
/// success the caller-supplied message is logged.
pub async fn execute_with_retry(
    executor: &dyn SqlExecutor,
    sql: &str,
    success_message: &str,
) -> Result<(), ExecutorError> {
    let mut attempt = 1;
    loop {
        match executor.execute(sql).await {
            Ok(()) => {
                log::info!("{}", success_message);
                return Ok(());
            }
            Err(ExecutorError::Transient(reason)) => {
                if attempt >= MAX_ATTEMPTS {
                    log::error!(
                        "giving up after {} attempts: {}",
                        MAX_ATTEMPTS,
                        reason
                    );
                    return Err(ExecutorError::Transient(reason));
                }
                let delay = std::time::Duration::from_millis(200 * 2u64.pow(attempt - 1));
                log::warn!(
                    "transient failure ({}), attempt {}/{}, retrying in {:?}",
                    reason,
                    attempt,
                    MAX_ATTEMPTS,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    #[tokio::test]
    async fn retry_recovers_from_transient_failure() {
        let mut executor = MockSqlExecutor::new();
        let mut seq = Sequence::new();
        executor
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ExecutorError::Transient("broken pipe".to_string())));
        executor
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let result = execute_with_retry(&executor, "CREATE TABLE t AS SELECT 1", "created").await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn retry_gives_up_after_three_attempts() {
        let mut executor = MockSqlExecutor::new();
        executor
            .expect_execute()
            .times(3)
            .returning(|_| Err(ExecutorError::Transient("connection reset".to_string())));

        let result = execute_with_retry(&executor, "CREATE TABLE t AS SELECT 1", "created").await;
        assert_eq!(
            result,
            Err(ExecutorError::Transient("connection reset".to_string()))
        );
    }

    #[tokio::test]
    async fn query_errors_are_not_retried() {
        let mut executor = MockSqlExecutor::new();
        executor
            .expect_execute()
            .times(1)
            .returning(|_| Err(ExecutorError::Query("syntax error".to_string())));

        let result = execute_with_retry(&executor, "CREATE TABLE", "created").await;
        assert_eq!(result, Err(ExecutorError::Query("syntax error".to_string())));
    }
}
