//! Query plan: base statement plus clause sections, and the compile step.

use crate::arg::NamedArg;
use crate::clause::{Clause, ClauseKind};
use crate::error::{FilterError, FilterResult};
use crate::validator::{self, Validator};
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A compiled statement with `?` placeholders and its positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compiled {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Walk `sql`, reporting each char and whether it is a bare `?` placeholder.
///
/// Quotes (`'`, `"`) and backtick identifiers are skipped; a backslash escapes
/// the next char inside string literals, as MySQL does. Doubled quotes close
/// and reopen the literal, which leaves the state unchanged.
fn scan(sql: &str, mut visit: impl FnMut(char, bool)) {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in sql.chars() {
        match quote {
            None => {
                if matches!(c, '\'' | '"' | '`') {
                    quote = Some(c);
                }
                visit(c, c == '?');
            }
            Some(_) if escaped => {
                escaped = false;
                visit(c, false);
            }
            Some(q) => {
                if c == '\\' && q != '`' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                visit(c, false);
            }
        }
    }
}

impl Compiled {
    /// Count `?` placeholders outside quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        scan(&self.sql, |_, placeholder| count += usize::from(placeholder));
        count
    }

    /// Fail when the placeholder count differs from the argument count.
    pub fn check_placeholders(&self) -> FilterResult<()> {
        let placeholders = self.placeholder_count();
        if placeholders != self.args.len() {
            return Err(FilterError::PlaceholderMismatch {
                placeholders,
                args: self.args.len(),
            });
        }
        Ok(())
    }

    /// Render placeholders as `$1, $2, ...` for drivers with numbered parameters.
    pub fn numbered(&self) -> String {
        use std::fmt::Write;

        let mut out = String::with_capacity(self.sql.len() + 8);
        let mut idx: usize = 0;
        scan(&self.sql, |c, placeholder| {
            if placeholder {
                idx += 1;
                let _ = write!(&mut out, "${idx}");
            } else {
                out.push(c);
            }
        });
        out
    }

    /// Bind `values` ahead of the existing arguments, for placeholders that
    /// live in the base statement itself.
    pub fn prepend_args(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        let mut args: Vec<Value> = values.into_iter().collect();
        args.append(&mut self.args);
        self.args = args;
        self
    }

    /// Wrap the statement as a derived table: `{prefix}({sql}){suffix}`.
    pub fn wrap(mut self, prefix: &str, suffix: &str) -> Self {
        self.sql = format!("{prefix}({}){suffix}", self.sql);
        self
    }
}

/// The plan behind a [`Filter`](crate::Filter).
///
/// The entity layer supplies the base statement and one [`Validator`] per clause
/// kind; filter callers only attach directives. A plan can be compiled, mutated
/// (new base statement, clauses removed) and compiled again.
#[derive(Clone, Default)]
pub struct Query {
    statement: String,
    clauses: Vec<Clause>,
    validators: BTreeMap<ClauseKind, Arc<dyn Validator>>,
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("statement", &self.statement)
            .field("clauses", &self.clauses)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unparameterized `SELECT ... FROM ...` skeleton.
    pub fn set_statement(&mut self, statement: impl Into<String>) -> &mut Self {
        self.statement = statement.into();
        self
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Register the validator for a clause kind, replacing any previous one.
    ///
    /// Registration is independent of whether the clause exists yet.
    pub fn register<V>(&mut self, kind: ClauseKind, validator: V) -> &mut Self
    where
        V: Validator + 'static,
    {
        self.validators.insert(kind, Arc::new(validator));
        self
    }

    pub fn clause(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.kind() == kind)
    }

    /// Check if a clause of this kind is attached.
    pub fn has(&self, kind: ClauseKind) -> bool {
        self.clause(kind).is_some()
    }

    /// Look up a directive by clause kind and name.
    pub fn arg(&self, kind: ClauseKind, name: &str) -> Option<&NamedArg> {
        self.clause(kind).and_then(|c| c.arg(name))
    }

    /// Append a directive to the clause of `kind`, creating the clause on first use.
    ///
    /// An empty name creates the clause but attaches nothing.
    pub fn attach(&mut self, kind: ClauseKind, arg: NamedArg) -> &mut Self {
        let clause = self.clause_mut(kind);
        if !arg.name().is_empty() {
            clause.push(arg);
        }
        self
    }

    /// Replace all directives of the clause of `kind`.
    pub fn replace(&mut self, kind: ClauseKind, args: Vec<NamedArg>) -> &mut Self {
        self.clause_mut(kind).replace(args);
        self
    }

    /// Remove the clause of `kind`; no-op when absent.
    pub fn unset(&mut self, kind: ClauseKind) -> &mut Self {
        self.clauses.retain(|c| c.kind() != kind);
        self
    }

    fn clause_mut(&mut self, kind: ClauseKind) -> &mut Clause {
        let idx = match self.clauses.iter().position(|c| c.kind() == kind) {
            Some(idx) => idx,
            None => {
                self.clauses.push(Clause::new(kind));
                self.clauses.len() - 1
            }
        };
        &mut self.clauses[idx]
    }

    fn validator(&self, kind: ClauseKind) -> Option<&dyn Validator> {
        match self.validators.get(&kind) {
            Some(v) => Some(&**v),
            None if kind == ClauseKind::Limit => Some(&validator::pagination as &dyn Validator),
            None => None,
        }
    }

    /// Compile the plan into SQL text and positional arguments.
    ///
    /// Clauses render in priority order after the base statement. The first
    /// validator failure aborts the whole compile; no partial statement is
    /// returned.
    pub fn compile(&self) -> FilterResult<Compiled> {
        let mut ordered: Vec<&Clause> = self.clauses.iter().collect();
        ordered.sort_by_key(|c| c.kind().priority());

        let mut sql = self.statement.trim_end().to_string();
        let mut args = Vec::new();

        for clause in ordered {
            let kind = clause.kind();
            let rendered = clause.render(self.validator(kind))?;
            if rendered.fragments.is_empty() {
                continue;
            }

            sql.push(' ');
            sql.push_str(kind.keyword());
            sql.push(' ');
            sql.push_str(&rendered.fragments.join(kind.glue()));

            if kind.contributes_args() {
                args.extend(rendered.values);
            }
        }

        Ok(Compiled { sql, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(sql: &str, args: Vec<Value>) -> Compiled {
        Compiled {
            sql: sql.to_string(),
            args,
        }
    }

    #[test]
    fn counts_placeholders_outside_quotes() {
        let c = compiled("SELECT '?' , `a?` FROM t WHERE a = ? AND b = \"?\"", vec![]);
        assert_eq!(c.placeholder_count(), 1);
    }

    #[test]
    fn escaped_quotes_stay_inside_literals() {
        let c = compiled(r"SELECT 'a\'?' , 'it''s ?' FROM t WHERE a = ? AND b = '\\' AND c = ?", vec![]);
        assert_eq!(c.placeholder_count(), 2);
        assert_eq!(
            c.numbered(),
            r"SELECT 'a\'?' , 'it''s ?' FROM t WHERE a = $1 AND b = '\\' AND c = $2"
        );
    }

    #[test]
    fn backslash_is_literal_in_identifiers() {
        let c = compiled(r"SELECT `a\` FROM t WHERE b = ?", vec![Value::Int(1)]);
        assert_eq!(c.placeholder_count(), 1);
        assert!(c.check_placeholders().is_ok());
    }

    #[test]
    fn check_placeholders_reports_mismatch() {
        let c = compiled("a = ? AND b = ?", vec![Value::Int(1)]);
        assert_eq!(
            c.check_placeholders(),
            Err(FilterError::PlaceholderMismatch {
                placeholders: 2,
                args: 1
            })
        );
    }

    #[test]
    fn numbered_placeholders() {
        let c = compiled("a = ? AND b LIKE '?' AND c = ?", vec![]);
        assert_eq!(c.numbered(), "a = $1 AND b LIKE '?' AND c = $2");
    }

    #[test]
    fn prepend_and_wrap() {
        let c = compiled("SELECT 1 FROM t WHERE a = ?", vec![Value::Int(2)])
            .prepend_args([Value::Int(1)])
            .wrap("SELECT COUNT(*) FROM ", " `tmp`");
        assert_eq!(c.sql, "SELECT COUNT(*) FROM (SELECT 1 FROM t WHERE a = ?) `tmp`");
        assert_eq!(c.args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn empty_plan_compiles_to_statement() {
        let mut q = Query::new();
        q.set_statement("SELECT 1 FROM t ");
        assert_eq!(q.compile().unwrap(), compiled("SELECT 1 FROM t", vec![]));
    }

    #[test]
    fn attach_with_empty_name_creates_clause_only() {
        let mut q = Query::new();
        q.attach(ClauseKind::Where, NamedArg::flag(""));
        assert!(q.has(ClauseKind::Where));
        assert!(q.clause(ClauseKind::Where).unwrap().is_empty());
        // no validator needed for an empty clause
        assert!(q.compile().is_ok());
    }
}
