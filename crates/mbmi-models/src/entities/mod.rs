//! Mail database entities.

mod access;
mod aliases;
mod bcc;
mod mailsearch;
mod spam;
mod stats;
mod transports;
mod users;

pub use access::{Access, Accesses};
pub use aliases::{Alias, Aliases};
pub use bcc::{BccItem, Bccs};
pub use mailsearch::MailSearch;
pub use spam::{DEFAULT_INTERVAL, Spam, Spammers};
pub use stats::{ServicesStat, Stat};
pub use transports::{Transport, Transports};
pub use users::{User, Users};

use crate::entity::{Entity, ListPlan, plan};
use crate::error::{ModelError, ModelResult};
use crate::params::RequestParams;
use std::fmt;
use std::str::FromStr;

/// Entity selected by name at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Users,
    Aliases,
    Bccs,
    Transports,
    Accesses,
    Stats,
    Spam,
    MailSearch,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Users,
        EntityKind::Aliases,
        EntityKind::Bccs,
        EntityKind::Transports,
        EntityKind::Accesses,
        EntityKind::Stats,
        EntityKind::Spam,
        EntityKind::MailSearch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Users => Users::NAME,
            EntityKind::Aliases => Aliases::NAME,
            EntityKind::Bccs => Bccs::NAME,
            EntityKind::Transports => Transports::NAME,
            EntityKind::Accesses => Accesses::NAME,
            EntityKind::Stats => ServicesStat::NAME,
            EntityKind::Spam => Spammers::NAME,
            EntityKind::MailSearch => MailSearch::NAME,
        }
    }

    /// Translate request parameters and plan the listing.
    pub fn plan(
        self,
        params: &RequestParams,
        default_limit: u64,
        with_count: bool,
    ) -> ModelResult<ListPlan> {
        fn run<E: Entity>(
            params: &RequestParams,
            default_limit: u64,
            with_count: bool,
        ) -> ModelResult<ListPlan> {
            plan::<E>(E::filter_from(params, default_limit), with_count)
        }

        match self {
            EntityKind::Users => run::<Users>(params, default_limit, with_count),
            EntityKind::Aliases => run::<Aliases>(params, default_limit, with_count),
            EntityKind::Bccs => run::<Bccs>(params, default_limit, with_count),
            EntityKind::Transports => run::<Transports>(params, default_limit, with_count),
            EntityKind::Accesses => run::<Accesses>(params, default_limit, with_count),
            EntityKind::Stats => run::<ServicesStat>(params, default_limit, with_count),
            EntityKind::Spam => run::<Spammers>(params, default_limit, with_count),
            EntityKind::MailSearch => run::<MailSearch>(params, default_limit, with_count),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::Validation(format!("unknown entity '{s}'")))
    }
}
