use crate::email::Email;
use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Alias {
    pub id: i64,
    pub alias: Email,
    pub recipient: Email,
    pub comment: String,
}

impl FromRow for Alias {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            alias: row.try_get("alias")?,
            recipient: row.try_get("recipient")?,
            comment: row.try_get("comment")?,
        })
    }
}

pub struct Aliases;

fn alias_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "id" => "`a`.`id` = ?",
        "alias" => "`a`.`alias` = ?",
        "recipient" => "`a`.`recipient` LIKE ?",
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn alias_group(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "alias" => Ok("`a`.`alias`".to_string()),
        other => Err(FilterError::argument(other)),
    }
}

fn alias_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "id" => "`a`.`id`",
        "alias" => "`a`.`alias`",
        "recipient" => "`a`.`recipient`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

impl Entity for Aliases {
    type Row = Alias;

    const NAME: &'static str = "aliases";

    const ROW_SQL: &'static str = "SELECT `a`.`id` `id`, `a`.`alias` `alias`, \
         `a`.`recipient` `recipient`, `a`.`comment` `comment` FROM `aliases` AS `a`";

    const COUNT_SQL: &'static str = "SELECT COUNT(*) FROM `aliases` AS `a`";

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(alias_where),
            ClauseKind::GroupBy => Some(alias_group),
            ClauseKind::OrderBy => Some(alias_order),
            ClauseKind::Limit => None,
        }
    }

    /// `alias` is exact, `recipient` a prefix match. A `group` request
    /// lists whole groups, so it is not paged.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(alias) = params.get("alias") {
            flt.and_where("alias", alias);
        }
        if let Some(recipient) = params.get("recipient") {
            flt.and_where("recipient", format!("{recipient}%"));
        }
        if let Some(sort) = params.sort() {
            flt.order_by(sort, params.ascending(true));
        }
        match params.non_empty("group") {
            Some(group) => {
                flt.group_by(group);
            }
            None => params.apply_paging(&mut flt, default_limit),
        }
        flt
    }
}
