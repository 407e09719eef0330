//! Error types for mbmi-filter

use crate::clause::ClauseKind;
use thiserror::Error;

/// Result type alias for filter compilation
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while compiling a filter into SQL.
///
/// Builder calls never fail; every error surfaces from [`Query::compile`](crate::Query::compile).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A validator rejected the directive: unknown name, or a value-taking
    /// name given as a flag. `clause` is filled in by compile.
    #[error("Unsupported filter argument: {name}{}", clause_suffix(.clause))]
    Argument {
        clause: Option<ClauseKind>,
        name: String,
    },

    /// The entity requires a directive that was never supplied.
    #[error("Filter is required: {0}")]
    Required(String),

    /// A populated clause has no validator registered.
    #[error("Validator required for the `{0}` clause")]
    ValidatorRequired(ClauseKind),

    /// The compiled statement and its argument list disagree.
    #[error("Placeholder mismatch: {placeholders} placeholders, {args} args")]
    PlaceholderMismatch { placeholders: usize, args: usize },

    /// Unknown clause keyword.
    #[error("Unknown clause: {0}")]
    InvalidClause(String),
}

impl FilterError {
    /// Create an unsupported-argument error for a directive name
    pub fn argument(name: impl Into<String>) -> Self {
        Self::Argument {
            clause: None,
            name: name.into(),
        }
    }

    /// Attach the rejecting clause to an argument error that has none yet.
    pub fn in_clause(self, kind: ClauseKind) -> Self {
        match self {
            Self::Argument { clause: None, name } => Self::Argument {
                clause: Some(kind),
                name,
            },
            other => other,
        }
    }

    /// Create a required-filter error
    pub fn required(name: impl Into<String>) -> Self {
        Self::Required(name.into())
    }

    /// Check if this is an unsupported-argument error
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument { .. })
    }

    /// Check if this is a required-filter error
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }
}

fn clause_suffix(clause: &Option<ClauseKind>) -> String {
    clause
        .as_ref()
        .map(|kind| format!(" in {kind}"))
        .unwrap_or_default()
}
