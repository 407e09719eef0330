use crate::email::Email;
use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};
use serde::Serialize;

/// Sender BCC rule: mail from `sender` to `recipient` is copied to `copy`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BccItem {
    pub id: i64,
    pub sender: Email,
    pub recipient: Email,
    pub copy: Email,
    pub comment: String,
}

impl FromRow for BccItem {
    fn from_row(row: &Row) -> ModelResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            recipient: row.try_get("recipient")?,
            copy: row.try_get("copy")?,
            comment: row.try_get("comment")?,
        })
    }
}

pub struct Bccs;

fn bcc_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "id" => "`b`.`id` = ?",
        "sender" => "`b`.`sender` LIKE ?",
        "recipient" => "`b`.`recipient` LIKE ?",
        "copy" => "`b`.`copy` LIKE ?",
        "search" => {
            arg.fan_out(3);
            "(`b`.`sender` LIKE ? OR `b`.`recipient` LIKE ? OR `b`.`copy` LIKE ?)"
        }
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn bcc_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "id" => "`b`.`id`",
        "sender" => "`b`.`sender`",
        "recipient" => "`b`.`recipient`",
        "copy" => "`b`.`copy`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

impl Entity for Bccs {
    type Row = BccItem;

    const NAME: &'static str = "bccs";

    const ROW_SQL: &'static str = "SELECT `b`.`id` `id`, `b`.`sender` `sender`, \
         `b`.`recipient` `recipient`, `b`.`copy` `copy`, `b`.`comment` `comment` \
         FROM `bcc` AS `b`";

    const COUNT_SQL: &'static str = "SELECT COUNT(*) FROM `bcc` AS `b`";

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(bcc_where),
            ClauseKind::OrderBy => Some(bcc_order),
            _ => None,
        }
    }

    /// `query` is a substring match on sender, recipient and copy.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(query) = params.non_empty("query") {
            flt.and_where("search", format!("%{query}%"));
        }
        if let Some(sort) = params.sort() {
            flt.order_by(sort, params.ascending(true));
        }
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
