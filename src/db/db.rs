// db/db.rs
use std::time::Duration;

use sqlx::{Pool, Postgres, Transaction};

use crate::service::error::ServiceError;

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
    pub transaction_timeout: Duration,
    pub lock_timeout: Duration,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .field("transaction_timeout", &self.transaction_timeout)
            .field("lock_timeout", &self.lock_timeout)
            .finish()
    }
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient {
            pool,
            transaction_timeout: Duration::from_secs(5),
            lock_timeout: Duration::from_secs(2),
        }
    }

    pub fn with_timeouts(mut self, transaction_timeout: Duration, lock_timeout: Duration) -> Self {
        self.transaction_timeout = transaction_timeout;
        self.lock_timeout = lock_timeout;
        self
    }

    /// Opens a transaction bounded by the configured statement and lock
    /// timeouts. Dropping it without `commit` rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT set_config('statement_timeout', $1, true), set_config('lock_timeout', $2, true)")
            .bind(format!("{}ms", self.transaction_timeout.as_millis()))
            .bind(format!("{}ms", self.lock_timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// True when `err` is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation() && db_err.constraint() == Some(constraint))
        .unwrap_or(false)
}

/// Escapes `%`, `_` and `\` so a keyword is matched literally by ILIKE.
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
