//! `tracing` output for the statements the store runs.

use mbmi_filter::Compiled;

/// Longest SQL text (in bytes) put into a log event.
pub const MAX_SQL_LENGTH: usize = 200;

/// Truncate a SQL string to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str) -> String {
    if sql.len() > MAX_SQL_LENGTH {
        format!("{}...", truncate_sql_bytes(sql, MAX_SQL_LENGTH))
    } else {
        sql.to_string()
    }
}

/// Emit the statement about to run at DEBUG under target `mbmi.sql`.
pub(crate) fn statement(entity: &str, compiled: &Compiled) {
    tracing::debug!(
        target: "mbmi.sql",
        entity,
        param_count = compiled.args.len(),
        args = ?compiled.args,
        sql = %display_sql(&compiled.sql),
        "query"
    );
}

/// Emit a write statement at DEBUG under target `mbmi.sql`.
pub(crate) fn write(op: &str, sql: &str, param_count: usize) {
    tracing::debug!(
        target: "mbmi.sql",
        op,
        param_count,
        sql = %display_sql(sql),
        "execute"
    );
}
