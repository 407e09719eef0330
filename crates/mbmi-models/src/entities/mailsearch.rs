use crate::entity::{Entity, ValidateFn};
use crate::params::RequestParams;
use mbmi_filter::{ClauseKind, Filter, FilterError, FilterResult, NamedArg};

/// Every known address: user mailboxes plus alias sources and targets.
pub struct MailSearch;

fn mail_where(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "mail" => {
            arg.require_value()?;
            Ok("`mail` LIKE ?".to_string())
        }
        other => Err(FilterError::argument(other)),
    }
}

fn mail_order(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "mail" => Ok(format!("`mail` {}", arg.direction())),
        other => Err(FilterError::argument(other)),
    }
}

macro_rules! mail_list {
    () => {
        "FROM (\
         SELECT CONCAT(`u`.`login`, '@', `t`.`domain`) AS `mail` \
         FROM `users` AS `u` LEFT JOIN `transport` AS `t` ON (`u`.`domid` = `t`.`id`) \
         UNION SELECT `alias` AS `mail` FROM `aliases` \
         UNION SELECT `recipient` AS `mail` FROM `aliases`\
         ) AS `maillist`"
    };
}

impl Entity for MailSearch {
    type Row = String;

    const NAME: &'static str = "mailsearch";

    const ROW_SQL: &'static str = concat!("SELECT `mail` ", mail_list!());

    const COUNT_SQL: &'static str = concat!("SELECT COUNT(*) ", mail_list!());

    fn validator(kind: ClauseKind) -> Option<ValidateFn> {
        match kind {
            ClauseKind::Where => Some(mail_where),
            ClauseKind::OrderBy => Some(mail_order),
            _ => None,
        }
    }

    /// `query` is a substring match, results in address order.
    fn filter_from(params: &RequestParams, default_limit: u64) -> Filter {
        let mut flt = Filter::new();
        if let Some(query) = params.non_empty("query") {
            flt.and_where("mail", format!("%{query}%"));
        }
        flt.order_by("mail", params.ascending(true));
        params.apply_paging(&mut flt, default_limit);
        flt
    }
}
