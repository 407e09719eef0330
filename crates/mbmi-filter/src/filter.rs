//! Caller-facing filter builder.

use crate::arg::{ASC, DESC, NamedArg};
use crate::clause::{ClauseKind, ROWS_LIMIT, ROWS_OFFSET};
use crate::query::Query;
use crate::value::Value;

/// Accumulates filter directives without any knowledge of SQL.
///
/// Every call only records intent; names are checked by the entity's
/// validators when the underlying [`Query`] is compiled.
///
/// # Example
/// ```ignore
/// use mbmi_filter::Filter;
///
/// let mut flt = Filter::new();
/// if let Some(email) = email {
///     flt.and_where("emlike", format!("{email}%"));
/// }
/// flt.order_by("id", true).limit(25, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    query: Query,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate directive; repeated calls are ANDed in call order.
    ///
    /// A `None` value makes this a flag directive, same as [`Filter::and_where_flag`].
    pub fn and_where(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.query
            .attach(ClauseKind::Where, NamedArg::new(name, [value.into()]));
        self
    }

    /// Add a predicate directive that carries no value.
    pub fn and_where_flag(&mut self, name: &str) -> &mut Self {
        self.query.attach(ClauseKind::Where, NamedArg::flag(name));
        self
    }

    /// Add a grouping directive.
    pub fn group_by(&mut self, name: &str) -> &mut Self {
        self.query.attach(ClauseKind::GroupBy, NamedArg::flag(name));
        self
    }

    /// Add an ordering directive; repeated calls keep call order.
    pub fn order_by(&mut self, name: &str, ascending: bool) -> &mut Self {
        let dir = if ascending { ASC } else { DESC };
        self.query
            .attach(ClauseKind::OrderBy, NamedArg::new(name, [Value::from(dir)]));
        self
    }

    /// Set pagination, replacing any previous call.
    ///
    /// Always binds two arguments, offset first. A `limit` of 0 means
    /// unbounded and binds `u64::MAX`.
    pub fn limit(&mut self, limit: u64, offset: u64) -> &mut Self {
        let limit = if limit == 0 { u64::MAX } else { limit };
        self.query.replace(
            ClauseKind::Limit,
            vec![
                NamedArg::new(ROWS_OFFSET, [Value::UInt(offset)]),
                NamedArg::new(ROWS_LIMIT, [Value::UInt(limit)]),
            ],
        );
        self
    }

    /// Remove a whole clause; no-op when absent.
    pub fn unset(&mut self, kind: ClauseKind) -> &mut Self {
        self.query.unset(kind);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    pub fn into_query(self) -> Query {
        self.query
    }
}

impl From<Filter> for Query {
    fn from(filter: Filter) -> Self {
        filter.query
    }
}
