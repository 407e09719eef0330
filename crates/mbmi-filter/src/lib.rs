//! # mbmi-filter
//!
//! Named-directive SQL composition for the mailbox manager API.
//!
//! Callers describe *what* to filter with a [`Filter`]; the entity layer
//! decides *how* by supplying a base statement and one [`Validator`] per
//! clause kind. Compiling renders `WHERE`, `GROUP BY`, `ORDER BY` and `LIMIT`
//! in a fixed order with `?` placeholders and a matching argument list.
//!
//! ## Features
//!
//! - **No SQL from callers**: directive names are translated by validators; unknown names fail
//! - **Positional args**: values follow placeholders in call order, including fan-out
//! - **Re-compilable**: swap the base statement and drop ordering/pagination to derive a count
//!
//! ```ignore
//! use mbmi_filter::{ClauseKind, Filter, FilterError, NamedArg};
//!
//! fn user_where(arg: &mut NamedArg) -> Result<String, FilterError> {
//!     match arg.name() {
//!         "id" => Ok("`u`.`id` = ?".into()),
//!         other => Err(FilterError::argument(other)),
//!     }
//! }
//!
//! let mut flt = Filter::new();
//! flt.and_where("id", 4).limit(10, 0);
//!
//! let query = flt.query_mut();
//! query.set_statement("SELECT * FROM `users` AS `u`");
//! query.register(ClauseKind::Where, user_where);
//! let rows = query.compile()?;
//!
//! query.set_statement("SELECT COUNT(*) FROM `users` AS `u`");
//! query.unset(ClauseKind::OrderBy).unset(ClauseKind::Limit);
//! let count = query.compile()?;
//! ```

pub mod arg;
pub mod clause;
pub mod error;
pub mod filter;
pub mod query;
pub mod validator;
pub mod value;

pub use arg::{ASC, DESC, NamedArg};
pub use clause::{Clause, ClauseKind, ROWS_LIMIT, ROWS_OFFSET};
pub use error::{FilterError, FilterResult};
pub use filter::Filter;
pub use query::{Compiled, Query};
pub use validator::Validator;
pub use value::Value;

#[cfg(test)]
mod tests;
