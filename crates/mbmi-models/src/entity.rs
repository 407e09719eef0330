//! Entity definitions and list planning.
//!
//! An [`Entity`] owns the SQL side of a listing: base statements and the
//! validators that translate directive names. Callers only build a
//! [`Filter`]; [`plan`] turns it into the row statement and, optionally,
//! the matching count statement.

use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::FromRow;
use mbmi_filter::{ClauseKind, Compiled, Filter, FilterResult, NamedArg, Query, Value};
use serde::Serialize;

/// Validator signature used by entity vocabularies.
pub type ValidateFn = fn(&mut NamedArg) -> FilterResult<String>;

/// A listable table (or view) of the mail database.
pub trait Entity {
    /// Decoded row type.
    type Row: FromRow + Serialize + Send;

    /// Name used in logs and on the command line.
    const NAME: &'static str;

    /// `SELECT <columns> FROM ...` without clauses.
    const ROW_SQL: &'static str;

    /// `SELECT COUNT(*) FROM ...` with the same joins as [`Entity::ROW_SQL`].
    const COUNT_SQL: &'static str;

    /// Validator for a clause kind; `None` leaves the kind unsupported
    /// (or, for `LIMIT`, uses the built-in pagination validator).
    fn validator(kind: ClauseKind) -> Option<ValidateFn>;

    /// Entity-forced directives and required-filter checks.
    fn prepare(_filter: &mut Filter) -> ModelResult<()> {
        Ok(())
    }

    /// Values for placeholders embedded in [`Entity::ROW_SQL`] itself.
    fn leading_args(_query: &Query) -> Vec<Value> {
        Vec::new()
    }

    /// Translate list request parameters into a filter.
    ///
    /// The default handles `sort`/`dir` (ascending unless `dir=desc`) and paging.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(sort) = params.sort() {
            flt.order_by(sort, params.ascending(true));
        }
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}

/// How the count statement is derived from the filtered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStrategy {
    /// Count statement replaces the base statement.
    Plain,
    /// Grouped queries: `SELECT COUNT(*) FROM (<compiled>) `tmp``.
    Wrapped,
}

impl CountStrategy {
    pub fn for_query(query: &Query) -> Self {
        if query.has(ClauseKind::GroupBy) {
            Self::Wrapped
        } else {
            Self::Plain
        }
    }
}

/// Compiled statements for one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPlan {
    pub rows: Compiled,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<Compiled>,
}

/// Build the row statement and, when `with_count`, the count statement.
///
/// Both statements are checked so the `?` count matches the argument count
/// before anything reaches a row source.
///
/// The count statement keeps every predicate and grouping of the row
/// statement and drops ordering and pagination, so its arguments are the
/// row arguments minus the pagination pair (and any leading arguments).
pub fn plan<E: Entity>(mut filter: Filter, with_count: bool) -> ModelResult<ListPlan> {
    E::prepare(&mut filter)?;

    let mut query = filter.into_query();
    for kind in ClauseKind::ALL {
        if let Some(validator) = E::validator(kind) {
            query.register(kind, validator);
        }
    }

    query.set_statement(E::ROW_SQL);
    let leading = E::leading_args(&query);
    let rows = query.compile()?.prepend_args(leading);
    rows.check_placeholders()?;

    if !with_count {
        return Ok(ListPlan { rows, count: None });
    }

    let strategy = CountStrategy::for_query(&query);
    query
        .set_statement(E::COUNT_SQL)
        .unset(ClauseKind::OrderBy)
        .unset(ClauseKind::Limit);
    let count = query.compile()?;
    let count = match strategy {
        CountStrategy::Plain => count,
        CountStrategy::Wrapped => count.wrap("SELECT COUNT(*) FROM ", " `tmp`"),
    };
    count.check_placeholders()?;

    Ok(ListPlan {
        rows,
        count: Some(count),
    })
}
