use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};
use serde::Serialize;

/// Hosted mail domain and its delivery transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transport {
    pub id: i64,
    pub domain: String,
    pub uid: u32,
    pub gid: u32,
    pub transport: String,
    #[serde(rename = "rootdir")]
    pub root: String,
}

impl FromRow for Transport {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            domain: row.try_get("domain")?,
            uid: row.try_get("uid")?,
            gid: row.try_get("gid")?,
            transport: row.try_get("transport")?,
            root: row.try_get("rootdir")?,
        })
    }
}

pub struct Transports;

fn transport_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "id" => "`t`.`id` = ?",
        "domain" => "`t`.`domain` LIKE ?",
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn transport_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "id" => "`t`.`id`",
        "domain" => "`t`.`domain`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

impl Entity for Transports {
    type Row = Transport;

    const NAME: &'static str = "transports";

    const ROW_SQL: &'static str = "SELECT `t`.`id` `id`, `t`.`domain` `domain`, \
         `t`.`transport` `transport`, `t`.`rootdir` `rootdir`, `t`.`uid` `uid`, `t`.`gid` `gid` \
         FROM `transport` AS `t`";

    const COUNT_SQL: &'static str = "SELECT COUNT(*) FROM `transport` AS `t`";

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(transport_where),
            ClauseKind::OrderBy => Some(transport_order),
            _ => None,
        }
    }

    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(domain) = params.get("domain") {
            flt.and_where("domain", format!("{domain}%"));
        }
        if let Some(sort) = params.sort() {
            flt.order_by(sort, params.ascending(true));
        }
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
