use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg, Query, Value};
use serde::Serialize;

/// Days of history scored when a request names no interval.
pub const DEFAULT_INTERVAL: u64 = 60;

/// Spam score of one sending client over an interval.
///
/// `index` decays toward 1 as the summed victim score grows relative to
/// the interval length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spam {
    pub client: String,
    pub from: String,
    pub ip: String,
    pub attempt: u64,
    pub index: f64,
}

impl FromRow for Spam {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            client: row.try_get("client")?,
            from: row.try_get("from")?,
            ip: row.try_get("ip")?,
            attempt: row.try_get("attempt")?,
            index: row.try_get("index")?,
        })
    }
}

/// `spammers`, always grouped by client and scoped to an interval in days.
pub struct Spammers;

fn spam_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "client" => "`s`.`client` LIKE ?",
        "interval" => "`s`.`created` >= NOW() - INTERVAL ? DAY",
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn spam_group(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "client" => Ok("`client`".to_string()),
        other => Err(FilterError::argument(other)),
    }
}

fn spam_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "attempt" => "`attempt`",
        "index" => "`index`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

fn interval(query: &Query) -> Option<&Value> {
    query
        .arg(ClauseKind::Where, "interval")
        .and_then(NamedArg::first)
}

impl Entity for Spammers {
    type Row = Spam;

    const NAME: &'static str = "spam";

    // the `?` in `index` is bound to the interval
    const ROW_SQL: &'static str = "SELECT `s`.`client` `client`, `s`.`from` `from`, `s`.`ip` `ip`, \
         SUM(`s`.`spam_victims_score`) `attempt`, \
         (1 - POW(EXP(1), -(SUM(`s`.`spam_victims_score`) / ?))) `index` \
         FROM `spammers` AS `s`";

    const COUNT_SQL: &'static str = "SELECT 1 FROM `spammers` AS `s`";

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(spam_where),
            ClauseKind::GroupBy => Some(spam_group),
            ClauseKind::OrderBy => Some(spam_order),
            ClauseKind::Limit => None,
        }
    }

    fn prepare(filter: &mut Filter) -> ModelResult<()> {
        if interval(filter.query()).is_none() {
            return Err(FilterError::required("interval").into());
        }
        if filter.query().arg(ClauseKind::GroupBy, "client").is_none() {
            filter.group_by("client");
        }
        Ok(())
    }

    fn leading_args(query: &Query) -> Vec<Value> {
        interval(query).cloned().into_iter().collect()
    }

    /// `interval` below 1 (or missing) means the default; `sort` is ascending.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let interval = params
            .get("interval")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(DEFAULT_INTERVAL);

        let mut flt = Filter::new();
        if let Some(sort) = params.sort() {
            flt.order_by(sort, true);
        }
        flt.and_where("interval", interval);
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
