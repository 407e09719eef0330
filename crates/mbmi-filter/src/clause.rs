//! Ordered clause sections of a compiled statement.

use crate::arg::NamedArg;
use crate::error::{FilterError, FilterResult};
use crate::validator::Validator;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Name of the pagination offset argument.
pub const ROWS_OFFSET: &str = "rowsoffset";
/// Name of the pagination limit argument.
pub const ROWS_LIMIT: &str = "rowslimit";

/// Kind of a clause section.
///
/// Each kind fixes its keyword, glue, position in the compiled statement, and
/// whether its values are bound as positional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClauseKind {
    Where,
    GroupBy,
    OrderBy,
    Limit,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 4] = [
        ClauseKind::Where,
        ClauseKind::GroupBy,
        ClauseKind::OrderBy,
        ClauseKind::Limit,
    ];

    /// SQL keyword that introduces the clause.
    pub const fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Where => "WHERE",
            ClauseKind::GroupBy => "GROUP BY",
            ClauseKind::OrderBy => "ORDER BY",
            ClauseKind::Limit => "LIMIT",
        }
    }

    /// String joining the rendered fragments of one clause.
    pub const fn glue(self) -> &'static str {
        match self {
            ClauseKind::Where => " AND ",
            ClauseKind::GroupBy | ClauseKind::OrderBy | ClauseKind::Limit => ",",
        }
    }

    /// Position in the compiled statement, lowest first. Gaps are reserved
    /// for future kinds (e.g. HAVING between grouping and ordering).
    pub const fn priority(self) -> u8 {
        match self {
            ClauseKind::Where => 2,
            ClauseKind::GroupBy => 3,
            ClauseKind::OrderBy => 4,
            ClauseKind::Limit => 7,
        }
    }

    /// Whether argument values are appended to the positional argument list.
    ///
    /// Grouping and ordering render literal columns; their values (such as the
    /// ordering token) are consumed by the validator, never bound.
    pub const fn contributes_args(self) -> bool {
        matches!(self, ClauseKind::Where | ClauseKind::Limit)
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ClauseKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        ClauseKind::ALL
            .into_iter()
            .find(|k| k.keyword().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| FilterError::InvalidClause(s.to_string()))
    }
}

/// A clause section holding the directives attached to it, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    kind: ClauseKind,
    args: Vec<NamedArg>,
}

/// Output of rendering one clause.
#[derive(Debug, Default)]
pub(crate) struct Rendered {
    pub fragments: Vec<String>,
    pub values: Vec<Value>,
}

impl Clause {
    pub(crate) fn new(kind: ClauseKind) -> Self {
        Self {
            kind,
            args: Vec::new(),
        }
    }

    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    pub fn args(&self) -> &[NamedArg] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Look up a directive by name (first match).
    pub fn arg(&self, name: &str) -> Option<&NamedArg> {
        self.args.iter().find(|a| a.name() == name)
    }

    pub(crate) fn push(&mut self, arg: NamedArg) {
        self.args.push(arg);
    }

    pub(crate) fn replace(&mut self, args: Vec<NamedArg>) {
        self.args = args;
    }

    /// Validate every directive and collect fragments and values.
    ///
    /// Each directive is validated on a copy so fan-out never leaks into the plan.
    pub(crate) fn render(&self, validator: Option<&dyn Validator>) -> FilterResult<Rendered> {
        let mut out = Rendered::default();
        if self.args.is_empty() {
            return Ok(out);
        }

        let Some(validator) = validator else {
            return Err(FilterError::ValidatorRequired(self.kind));
        };

        for arg in &self.args {
            let mut arg = arg.clone();
            let fragment = validator
                .validate(&mut arg)
                .map_err(|err| err.in_clause(self.kind))?;
            if fragment.is_empty() {
                continue;
            }
            out.fragments.push(fragment);
            out.values.extend(arg.into_values());
        }

        Ok(out)
    }
}
