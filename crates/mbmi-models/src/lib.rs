//! # mbmi-models
//!
//! Mail database entities for the mailbox manager API: users, aliases,
//! sender BCC rules, transports, client access rules, login statistics,
//! spam scores and address search.
//!
//! Each entity is an [`Entity`] that supplies its base statements and
//! directive vocabulary to [`mbmi_filter`]. [`plan`] compiles a listing;
//! [`Store`] runs it against any [`RowSource`].
//!
//! ```ignore
//! use mbmi_models::{RequestParams, Store, Users, Entity};
//!
//! let params = RequestParams::parse("email=bob&limit=25");
//! let filter = Users::filter_from(&params, 100);
//! let page = Store::new(pool).list::<Users>(filter, true).await?;
//! ```

pub mod email;
pub mod entities;
pub mod entity;
pub mod error;
pub mod params;
pub mod response;
pub mod row;
pub mod source;
pub mod store;
mod trace;

#[cfg(test)]
pub(crate) mod testing;

pub use email::Email;
pub use entities::{
    Access, Accesses, Alias, Aliases, BccItem, Bccs, EntityKind, MailSearch, ServicesStat, Spam,
    Spammers, Stat, Transport, Transports, User, Users,
};
pub use entity::{CountStrategy, Entity, ListPlan, ValidateFn, plan};
pub use error::{ModelError, ModelResult};
pub use params::{DEFAULT_LIMIT, RequestParams};
pub use response::{ErrorBody, Response};
pub use row::{FromRow, FromValue, Row};
pub use source::{Executed, RowSource};
pub use store::{Listing, Store};

pub use mbmi_filter::{Compiled, Filter, FilterError, Value};
