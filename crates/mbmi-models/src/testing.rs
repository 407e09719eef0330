//! In-memory [`RowSource`] that records every statement.

use crate::error::{ModelError, ModelResult};
use crate::row::Row;
use crate::source::{Executed, RowSource};
use mbmi_filter::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Answers queries from a queue of canned results, in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingSource {
    calls: Mutex<Vec<Call>>,
    results: Mutex<VecDeque<ModelResult<Vec<Row>>>>,
    next_id: Mutex<i64>,
}

impl RecordingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.results.lock().unwrap().push_back(Ok(rows));
        self
    }

    pub fn push_count(&self, count: u64) -> &Self {
        self.push_rows(vec![Row::from_pairs([("COUNT(*)", Value::UInt(count))])])
    }

    pub fn push_error(&self, message: &str) -> &Self {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(ModelError::store(message)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, args: &[Value]) {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            args: args.to_vec(),
        });
    }
}

impl RowSource for RecordingSource {
    async fn fetch_all(&self, sql: &str, args: &[Value]) -> ModelResult<Vec<Row>> {
        self.record(sql, args);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> ModelResult<Executed> {
        self.record(sql, args);
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        Ok(Executed {
            rows_affected: 1,
            last_insert_id: Some(*next_id),
        })
    }
}
