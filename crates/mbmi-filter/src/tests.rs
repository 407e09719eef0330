//! Compile-level tests for the filter engine.

use crate::{ClauseKind, Compiled, Filter, FilterError, FilterResult, NamedArg, Query, Value};

const USERS: &str = "SELECT * FROM `u`.`users` ";
const USERS_COUNT: &str = "SELECT COUNT(*) FROM `u`.`users` ";

fn user_where(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "id" => Ok("`u`.`id` = ?".to_string()),
        "login" => Ok("`u`.`login` = ?".to_string()),
        "domain" => Ok("`t`.`domain` = ?".to_string()),
        "active" => Ok("`u`.`active` = 1".to_string()),
        "search" => {
            arg.fan_out(3);
            Ok("(`u`.`login` LIKE ? OR `u`.`name` LIKE ? OR `t`.`domain` LIKE ?)".to_string())
        }
        "noop" => Ok(String::new()),
        other => Err(FilterError::argument(other)),
    }
}

fn user_order(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "id" => Ok(format!("`u`.`id` {}", arg.direction())),
        "login" => Ok(format!("`u`.`login` {}", arg.direction())),
        other => Err(FilterError::argument(other)),
    }
}

fn user_group(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        "domain" => Ok("`t`.`domain`".to_string()),
        other => Err(FilterError::argument(other)),
    }
}

fn users(flt: &mut Filter) -> &mut Query {
    let q = flt.query_mut();
    q.set_statement(USERS)
        .register(ClauseKind::Where, user_where)
        .register(ClauseKind::GroupBy, user_group)
        .register(ClauseKind::OrderBy, user_order);
    q
}

fn compile(flt: &mut Filter) -> FilterResult<Compiled> {
    let compiled = users(flt).compile()?;
    compiled.check_placeholders()?;
    Ok(compiled)
}

#[test]
fn where_order_limit() {
    let mut flt = Filter::new();
    flt.and_where("id", 1)
        .and_where("login", "bob")
        .order_by("id", true)
        .order_by("login", false)
        .limit(100, 1);

    let c = compile(&mut flt).unwrap();
    assert_eq!(
        c.sql,
        "SELECT * FROM `u`.`users` WHERE `u`.`id` = ? AND `u`.`login` = ? \
         ORDER BY `u`.`id` ASC,`u`.`login` DESC LIMIT ?,?"
    );
    assert_eq!(
        c.args,
        vec![
            Value::Int(1),
            Value::from("bob"),
            Value::UInt(1),
            Value::UInt(100)
        ]
    );
}

#[test]
fn id_predicate() {
    let mut flt = Filter::new();
    flt.and_where("id", 4);

    let c = compile(&mut flt).unwrap();
    assert!(c.sql.contains("`u`.`id` = ?"));
    assert_eq!(c.args, vec![Value::Int(4)]);
}

#[test]
fn predicates_join_with_and_in_call_order() {
    let names = ["domain", "login", "id"];
    let expected = ["`t`.`domain` = ?", "`u`.`login` = ?", "`u`.`id` = ?"];
    for n in 1..=names.len() {
        let mut flt = Filter::new();
        for name in &names[..n] {
            flt.and_where(name, 7);
        }
        let c = compile(&mut flt).unwrap();
        let where_part = c.sql.split(" WHERE ").nth(1).unwrap();
        let fragments: Vec<&str> = where_part.split(" AND ").collect();
        assert_eq!(fragments, expected[..n]);
        assert_eq!(c.args, vec![Value::Int(7); n]);
    }
}

#[test]
fn clauses_render_in_priority_order_regardless_of_call_order() {
    let mut flt = Filter::new();
    flt.limit(5, 0)
        .order_by("id", false)
        .group_by("domain")
        .and_where("id", 2);

    let c = compile(&mut flt).unwrap();
    assert_eq!(
        c.sql,
        "SELECT * FROM `u`.`users` WHERE `u`.`id` = ? GROUP BY `t`.`domain` \
         ORDER BY `u`.`id` DESC LIMIT ?,?"
    );
    assert_eq!(c.args, vec![Value::Int(2), Value::UInt(0), Value::UInt(5)]);
}

#[test]
fn limit_args_trail_offset_first() {
    for preds in 0..4 {
        let mut flt = Filter::new();
        for _ in 0..preds {
            flt.and_where("id", 9);
        }
        flt.limit(20, 40);

        let c = compile(&mut flt).unwrap();
        assert_eq!(c.args.len(), preds + 2);
        assert_eq!(&c.args[preds..], &[Value::UInt(40), Value::UInt(20)]);
        assert!(c.sql.ends_with(" LIMIT ?,?"));
    }
}

#[test]
fn unset_order_restores_previous_statement() {
    let mut before = Filter::new();
    before.and_where("login", "bob");
    let expected = compile(&mut before).unwrap();

    let mut flt = Filter::new();
    flt.and_where("login", "bob").order_by("id", true);
    flt.unset("ORDER BY".parse().unwrap());

    let c = compile(&mut flt).unwrap();
    assert!(!c.sql.contains("ORDER BY"));
    assert_eq!(c, expected);
}

#[test]
fn unknown_directive_fails_without_sql() {
    let mut flt = Filter::new();
    flt.and_where("id", 1).and_where("bogus", 1);

    let err = users(&mut flt).compile().unwrap_err();
    assert_eq!(
        err,
        FilterError::Argument {
            clause: Some(ClauseKind::Where),
            name: "bogus".to_string()
        }
    );
    assert!(err.is_argument());
}

#[test]
fn unknown_order_name_fails() {
    let mut flt = Filter::new();
    flt.order_by("passwd", true);
    let err = users(&mut flt).compile().unwrap_err();
    assert!(err.is_argument());
    assert_eq!(err.to_string(), "Unsupported filter argument: passwd in ORDER BY");
}

#[test]
fn missing_validator_is_configuration_error() {
    let mut flt = Filter::new();
    flt.and_where("id", 1).order_by("id", true);

    let q = flt.query_mut();
    q.set_statement(USERS).register(ClauseKind::Where, user_where);
    assert_eq!(
        q.compile().unwrap_err(),
        FilterError::ValidatorRequired(ClauseKind::OrderBy)
    );
}

#[test]
fn limit_needs_no_registration() {
    let mut flt = Filter::new();
    flt.limit(10, 0);
    let q = flt.query_mut();
    q.set_statement(USERS);
    let c = q.compile().unwrap();
    assert_eq!(c.sql, "SELECT * FROM `u`.`users` LIMIT ?,?");
}

#[test]
fn empty_fragment_skips_directive() {
    let mut flt = Filter::new();
    flt.and_where("noop", 1).and_where("id", 3);

    let c = compile(&mut flt).unwrap();
    assert_eq!(c.sql, "SELECT * FROM `u`.`users` WHERE `u`.`id` = ?");
    assert_eq!(c.args, vec![Value::Int(3)]);
}

#[test]
fn only_skipped_directives_omit_keyword() {
    let mut flt = Filter::new();
    flt.and_where("noop", 1);
    let c = compile(&mut flt).unwrap();
    assert_eq!(c.sql, "SELECT * FROM `u`.`users`");
    assert!(c.args.is_empty());
}

#[test]
fn flag_directive_binds_nothing() {
    let mut flt = Filter::new();
    flt.and_where_flag("active").and_where("id", 1);

    let c = compile(&mut flt).unwrap();
    assert_eq!(
        c.sql,
        "SELECT * FROM `u`.`users` WHERE `u`.`active` = 1 AND `u`.`id` = ?"
    );
    assert_eq!(c.args, vec![Value::Int(1)]);
}

#[test]
fn fan_out_repeats_value_at_fragment_positions() {
    let mut flt = Filter::new();
    flt.and_where("id", 1).and_where("search", "%ann%").limit(10, 0);

    let c = compile(&mut flt).unwrap();
    assert_eq!(
        c.args,
        vec![
            Value::Int(1),
            Value::from("%ann%"),
            Value::from("%ann%"),
            Value::from("%ann%"),
            Value::UInt(0),
            Value::UInt(10),
        ]
    );
    // plan keeps the single value, so a second compile is identical
    assert_eq!(compile(&mut flt).unwrap(), c);
}

#[test]
fn group_and_order_values_are_not_bound() {
    let mut flt = Filter::new();
    flt.group_by("domain").order_by("login", true);
    let c = compile(&mut flt).unwrap();
    assert!(c.args.is_empty());
}

#[test]
fn count_derivation_keeps_predicate_args() {
    let mut flt = Filter::new();
    flt.and_where("login", "bob")
        .and_where("search", "%b%")
        .order_by("id", false)
        .limit(10, 30);

    let rows = compile(&mut flt).unwrap();

    let q = flt.query_mut();
    q.set_statement(USERS_COUNT)
        .unset(ClauseKind::OrderBy)
        .unset(ClauseKind::Limit);
    let count = q.compile().unwrap();
    count.check_placeholders().unwrap();

    assert_eq!(
        count.sql,
        "SELECT COUNT(*) FROM `u`.`users` WHERE `u`.`login` = ? AND \
         (`u`.`login` LIKE ? OR `u`.`name` LIKE ? OR `t`.`domain` LIKE ?)"
    );
    assert_eq!(count.args.len(), rows.args.len() - 2);
    assert_eq!(&rows.args[..count.args.len()], count.args.as_slice());
}

#[test]
fn closures_are_validators() {
    let column = String::from("`x`.`y`");
    let mut flt = Filter::new();
    flt.and_where("y", 1);
    let q = flt.query_mut();
    q.set_statement("SELECT 1 FROM `x`")
        .register(ClauseKind::Where, move |arg: &mut NamedArg| match arg.name() {
            "y" => Ok(format!("{column} = ?")),
            other => Err(FilterError::argument(other)),
        });
    assert_eq!(q.compile().unwrap().sql, "SELECT 1 FROM `x` WHERE `x`.`y` = ?");
}
