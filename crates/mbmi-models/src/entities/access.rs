use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};
use serde::Serialize;

/// Postfix client access rule (`OK`, `REJECT`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Access {
    pub client: String,
    pub access: String,
}

impl FromRow for Access {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            client: row.try_get("client")?,
            access: row.try_get("access")?,
        })
    }
}

pub struct Accesses;

fn access_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "search" => "`client` LIKE ?",
        "access" => "`access` = ?",
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn access_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "client" => "`client`",
        "access" => "`access`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

impl Entity for Accesses {
    type Row = Access;

    const NAME: &'static str = "accesses";

    const ROW_SQL: &'static str = "SELECT `client`, `access` FROM `client_access`";

    const COUNT_SQL: &'static str = "SELECT COUNT(*) FROM `client_access`";

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(access_where),
            ClauseKind::OrderBy => Some(access_order),
            _ => None,
        }
    }

    /// Sorting is always descending.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(sort) = params.sort() {
            flt.order_by(sort, false);
        }
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
