//! Per-entity directive validation.

use crate::arg::NamedArg;
use crate::error::{FilterError, FilterResult};

/// Translates a directive into a SQL fragment.
///
/// Return the fragment (with one `?` per value the argument carries), an empty
/// string to skip the directive, or [`FilterError::Argument`] for names the
/// entity does not support. The validator may call [`NamedArg::fan_out`] on the
/// argument it receives; the plan itself is never modified.
pub trait Validator: Send + Sync {
    fn validate(&self, arg: &mut NamedArg) -> FilterResult<String>;
}

impl<F> Validator for F
where
    F: Fn(&mut NamedArg) -> FilterResult<String> + Send + Sync,
{
    fn validate(&self, arg: &mut NamedArg) -> FilterResult<String> {
        self(arg)
    }
}

/// Validator of the pagination clause: one placeholder per bound.
pub(crate) fn pagination(arg: &mut NamedArg) -> FilterResult<String> {
    match arg.name() {
        crate::clause::ROWS_OFFSET | crate::clause::ROWS_LIMIT => Ok("?".to_string()),
        other => Err(FilterError::argument(other)),
    }
}
