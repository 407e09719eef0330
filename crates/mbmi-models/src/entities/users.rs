use crate::email::Email;
use crate::entity::{Entity, ValidateFn};
use crate::error::ModelResult;
use crate::params::RequestParams;
use crate::row::{FromRow, Row};
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};
use serde::Serialize;

/// Mailbox account joined with its domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub domain: u32,
    #[serde(rename = "domainname")]
    pub domain_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub uid: u32,
    pub gid: u32,
    pub smtp: bool,
    pub imap: bool,
    pub pop3: bool,
    pub sieve: bool,
    pub manager: bool,
    pub email: Email,
}

impl FromRow for User {
    fn from_row(row: &Row) -> ModelResult<Self> {
        let login: String = row.try_get("login")?;
        let domain_name: String = row.try_get("domainname")?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: Email::new(format!("{login}@{domain_name}")),
            login,
            domain: row.try_get("domid")?,
            domain_name,
            password: row.try_get("passwd")?,
            uid: row.try_get("uid")?,
            gid: row.try_get("gid")?,
            smtp: row.try_get("smtp")?,
            imap: row.try_get("imap")?,
            pop3: row.try_get("pop3")?,
            sieve: row.try_get("sieve")?,
            manager: row.try_get("manager")?,
        })
    }
}

/// `users` joined with `transport` for the domain name.
pub struct Users;

fn user_where(arg: &mut NamedArg) -> FilterResult<String> {
    let sql = match arg.name() {
        "emlike" => "CONCAT(`u`.`login`, '@', `t`.`domain`) LIKE ?",
        "id" => "`u`.`id` = ?",
        "login" => "`u`.`login` = ?",
        "domain" => "`t`.`domain` = ?",
        "passwd" => "`u`.`passwd` = ?",
        "manager" => "`u`.`manager` = ?",
        "imap" => "`u`.`imap` = ?",
        other => return Err(FilterError::argument(other)),
    };
    arg.require_value()?;
    Ok(sql.to_string())
}

fn user_order(arg: &mut NamedArg) -> FilterResult<String> {
    let column = match arg.name() {
        "id" => "`u`.`id`",
        "login" => "`u`.`login`",
        other => return Err(FilterError::argument(other)),
    };
    Ok(format!("{column} {}", arg.direction()))
}

impl Entity for Users {
    type Row = User;

    const NAME: &'static str = "users";

    const ROW_SQL: &'static str = "SELECT `u`.`id` `id`, `u`.`name` `name`, `u`.`login` `login`, \
         `u`.`domid` `domid`, `u`.`passwd` `passwd`, `u`.`uid` `uid`, `u`.`gid` `gid`, \
         `u`.`smtp` `smtp`, `u`.`imap` `imap`, `u`.`pop3` `pop3`, `u`.`sieve` `sieve`, \
         `u`.`manager` `manager`, `t`.`domain` `domainname` \
         FROM `users` AS `u` LEFT JOIN `transport` `t` ON (`u`.`domid` = `t`.`id`)";

    const COUNT_SQL: &'static str = "SELECT COUNT(*) \
         FROM `users` AS `u` LEFT JOIN `transport` `t` ON (`u`.`domid` = `t`.`id`)";

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(user_where),
            ClauseKind::OrderBy => Some(user_order),
            _ => None,
        }
    }

    /// `email` is a prefix match on `login@domain`.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(email) = params.get("email") {
            flt.and_where("emlike", format!("{email}%"));
        }
        if let Some(sort) = params.sort() {
            flt.order_by(sort, params.ascending(true));
        }
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
