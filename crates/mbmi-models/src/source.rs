//! Datastore seam.

use crate::error::{ModelError, ModelResult};
use crate::row::{FromValue, Row};
use mbmi_filter::Value;

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: u64,
    /// Auto-increment id of an `INSERT`, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// A trait over whatever runs compiled statements: a MySQL pool, a
/// transaction, or an in-memory fake in tests.
///
/// Statements use `?` placeholders and `args` are positional.
pub trait RowSource: Send + Sync {
    /// Execute a query and return all rows.
    fn fetch_all(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<Vec<Row>>> + Send;

    /// Execute a `SELECT COUNT(*) ...` and return the count.
    ///
    /// The default implementation reads the first column of the first row;
    /// no rows counts as 0.
    fn fetch_count(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        async move {
            let rows = self.fetch_all(sql, args).await?;
            let Some(value) = rows.first().and_then(|row| row.value_at(0)) else {
                return Ok(0);
            };
            u64::from_value(value).map_err(|msg| ModelError::decode("COUNT(*)", msg))
        }
    }

    /// Execute a write statement.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<Executed>> + Send;
}

impl<S: RowSource> RowSource for &S {
    async fn fetch_all(&self, sql: &str, args: &[Value]) -> ModelResult<Vec<Row>> {
        (**self).fetch_all(sql, args).await
    }

    async fn fetch_count(&self, sql: &str, args: &[Value]) -> ModelResult<u64> {
        (**self).fetch_count(sql, args).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> ModelResult<Executed> {
        (**self).execute(sql, args).await
    }
}
