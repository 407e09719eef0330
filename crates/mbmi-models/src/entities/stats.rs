use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use chrono::NaiveDateTime;
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};
use serde::Serialize;

/// Latest login record per user and service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stat {
    pub uid: i64,
    pub service: String,
    pub ip: String,
    #[serde(rename = "updated")]
    pub time: Option<NaiveDateTime>,
    #[serde(rename = "attempt")]
    pub count: i64,
}

impl FromRow for Stat {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            uid: row.try_get("uid")?,
            service: row.try_get("service")?,
            ip: row.try_get("ip")?,
            time: row.try_get("updated")?,
            count: row.try_get("attempt")?,
        })
    }
}

pub struct ServicesStat;

fn stat_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "uid" => "`s`.`uid` = ?",
        "ip" => "`s`.`ip` = INET_ATON(?)",
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn stat_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "attempt" => "`attempt`",
        "updated" => "`updated`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

impl Entity for ServicesStat {
    type Row = Stat;

    const NAME: &'static str = "stats";

    const ROW_SQL: &'static str = concat!(
        "SELECT `s`.`uid` `uid`, `s`.`service` `service`, ",
        "IF(`s`.`ip` IS NOT NULL, INET_NTOA(`s`.`ip`), '') `ip`, ",
        "`s`.`updated` `updated`, `s`.`attempt` `attempt` ",
        "FROM `statistics` AS `s` ",
        "INNER JOIN (SELECT `in_s`.`uid`, MAX(`in_s`.`updated`) `updated` FROM `statistics` AS `in_s` ",
        "GROUP BY `in_s`.`uid`, `in_s`.`service`) `tmp_s` ",
        "ON `s`.`uid` = `tmp_s`.`uid` AND `s`.`updated` = `tmp_s`.`updated`"
    );

    const COUNT_SQL: &'static str = concat!(
        "SELECT COUNT(*) ",
        "FROM `statistics` AS `s` ",
        "INNER JOIN (SELECT `in_s`.`uid`, MAX(`in_s`.`updated`) `updated` FROM `statistics` AS `in_s` ",
        "GROUP BY `in_s`.`uid`, `in_s`.`service`) `tmp_s` ",
        "ON `s`.`uid` = `tmp_s`.`uid` AND `s`.`updated` = `tmp_s`.`updated`"
    );

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(stat_where),
            ClauseKind::OrderBy => Some(stat_order),
            _ => None,
        }
    }

    /// Positive `uid` only; newest first unless `dir=asc`.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        let uid = params.get("uid").and_then(|v| v.parse::<i64>().ok());
        if let Some(uid) = uid.filter(|uid| *uid > 0) {
            flt.and_where("uid", uid);
        }
        flt.order_by(params.sort().unwrap_or("updated"), params.ascending(false));
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
