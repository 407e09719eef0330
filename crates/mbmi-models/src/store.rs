//! Listing and write operations over a [`RowSource`].

use crate::email::Email;
use crate::entities::{Alias, BccItem, User, Users};
use crate::entity::{Entity, plan};
use crate::error::{ModelError, ModelResult};
use crate::row::FromRow;
use crate::source::{Executed, RowSource};
use crate::trace;
use mbmi_filter::{Filter, Value};
use serde::Serialize;

/// One page of rows plus the unpaged total (0 when not requested).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub rows: Vec<T>,
    pub count: u64,
}

/// Entity access over a datastore.
///
/// ```ignore
/// let store = Store::new(pool);
/// let mut flt = Filter::new();
/// flt.and_where("emlike", "bob%").limit(25, 0);
/// let page = store.list::<Users>(flt, true).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Store<S> {
    source: S,
}

impl<S: RowSource> Store<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// List rows of `E` matching `filter`, with the total count when `with_count`.
    pub async fn list<E: Entity>(
        &self,
        filter: Filter,
        with_count: bool,
    ) -> ModelResult<Listing<E::Row>> {
        let result = self.fetch_listing::<E>(filter, with_count).await;
        if let Err(err) = &result {
            tracing::warn!(target: "mbmi.store", entity = E::NAME, error = %err, "listing failed");
        }
        result
    }

    async fn fetch_listing<E: Entity>(
        &self,
        filter: Filter,
        with_count: bool,
    ) -> ModelResult<Listing<E::Row>> {
        let plan = plan::<E>(filter, with_count)?;

        trace::statement(E::NAME, &plan.rows);
        let rows = self
            .source
            .fetch_all(&plan.rows.sql, &plan.rows.args)
            .await?
            .iter()
            .map(E::Row::from_row)
            .collect::<ModelResult<Vec<_>>>()?;

        let count = match &plan.count {
            Some(count) => {
                trace::statement(E::NAME, count);
                self.source.fetch_count(&count.sql, &count.args).await?
            }
            None => 0,
        };

        Ok(Listing { rows, count })
    }

    /// Exactly one row of `E` matching `filter`.
    ///
    /// Returns [`ModelError::NotFound`] for zero rows and for more than one.
    pub async fn find<E: Entity>(&self, filter: Filter) -> ModelResult<E::Row> {
        let mut listing = self.list::<E>(filter, false).await?;
        match listing.rows.len() {
            1 => Ok(listing.rows.remove(0)),
            0 => Err(ModelError::not_found(format!("{}: no matching row", E::NAME))),
            n => Err(ModelError::not_found(format!(
                "{}: expected one row, got {n}",
                E::NAME
            ))),
        }
    }

    /// Look up the mailbox owning `email` with `password`.
    pub async fn authenticate(&self, email: &Email, password: &str) -> ModelResult<User> {
        let (login, domain) = email.split()?;
        if password.is_empty() {
            return Err(ModelError::Validation("empty password".to_string()));
        }

        let mut flt = Filter::new();
        flt.and_where("login", login)
            .and_where("domain", domain)
            .and_where("passwd", password);
        self.find::<Users>(flt).await
    }

    /// Record an IMAP login of the IMAP-enabled mailbox `email` from `ip`.
    pub async fn record_imap_login(&self, email: &Email, ip: &str) -> ModelResult<User> {
        let (login, domain) = email.split()?;

        let mut flt = Filter::new();
        flt.and_where("imap", 1)
            .and_where("login", login)
            .and_where("domain", domain);
        let user = self.find::<Users>(flt).await?;

        self.set_stat_imap_login(user.id, ip).await?;
        Ok(user)
    }

    /// Insert or bump the `imap` statistics row of `uid`.
    pub async fn set_stat_imap_login(&self, uid: i64, ip: &str) -> ModelResult<()> {
        const SQL: &str = "INSERT INTO `statistics` (`uid`, `service`, `created`, `ip`, `updated`) \
             VALUES (?, ?, NOW(), INET_ATON(?), NOW()) \
             ON DUPLICATE KEY UPDATE `attempt` = `attempt` + 1, `updated` = NOW()";

        self.execute("stat_imap_login", SQL, &[uid.into(), "imap".into(), ip.into()])
            .await?;
        Ok(())
    }

    /// Update `alias` when it has an id, insert it otherwise.
    pub async fn set_alias(&self, alias: &mut Alias) -> ModelResult<()> {
        alias.alias.split()?;
        alias.recipient.split()?;

        let mut args: Vec<Value> = vec![
            (&alias.alias).into(),
            (&alias.recipient).into(),
            alias.comment.as_str().into(),
        ];
        if alias.id > 0 {
            args.push(alias.id.into());
            self.execute(
                "set_alias",
                "UPDATE `aliases` SET `alias` = ?, `recipient` = ?, `comment` = ? WHERE `id` = ?",
                &args,
            )
            .await?;
        } else {
            let done = self
                .execute(
                    "set_alias",
                    "INSERT INTO `aliases` (`alias`, `recipient`, `comment`) VALUES (?, ?, ?)",
                    &args,
                )
                .await?;
            if let Some(id) = done.last_insert_id {
                alias.id = id;
            }
        }
        Ok(())
    }

    pub async fn del_alias(&self, id: i64) -> ModelResult<u64> {
        let done = self
            .execute("del_alias", "DELETE FROM `aliases` WHERE `id` = ?", &[id.into()])
            .await?;
        Ok(done.rows_affected)
    }

    /// Update `bcc` when it has an id, insert it otherwise.
    pub async fn set_bcc(&self, bcc: &mut BccItem) -> ModelResult<()> {
        for email in [&bcc.sender, &bcc.recipient, &bcc.copy] {
            email.split()?;
        }

        let mut args: Vec<Value> = vec![
            (&bcc.sender).into(),
            (&bcc.recipient).into(),
            (&bcc.copy).into(),
            bcc.comment.as_str().into(),
        ];
        if bcc.id > 0 {
            args.push(bcc.id.into());
            self.execute(
                "set_bcc",
                "UPDATE `bcc` SET `sender` = ?, `recipient` = ?, `copy` = ?, `comment` = ? \
                 WHERE `id` = ?",
                &args,
            )
            .await?;
        } else {
            let done = self
                .execute(
                    "set_bcc",
                    "INSERT INTO `bcc` (`sender`, `recipient`, `copy`, `comment`) \
                     VALUES (?, ?, ?, ?)",
                    &args,
                )
                .await?;
            if let Some(id) = done.last_insert_id {
                bcc.id = id;
            }
        }
        Ok(())
    }

    pub async fn del_bcc(&self, id: i64) -> ModelResult<u64> {
        let done = self
            .execute("del_bcc", "DELETE FROM `bcc` WHERE `id` = ?", &[id.into()])
            .await?;
        Ok(done.rows_affected)
    }

    /// Update `user` when it has an id, insert it otherwise; a non-empty
    /// password is written as a separate statement.
    pub async fn set_user(&self, user: &mut User) -> ModelResult<()> {
        if user.login.is_empty() {
            return Err(ModelError::Validation("empty login".to_string()));
        }

        let mut args: Vec<Value> = vec![
            user.name.as_str().into(),
            user.login.as_str().into(),
            user.domain.into(),
            user.gid.into(),
            user.uid.into(),
            user.smtp.into(),
            user.imap.into(),
            user.pop3.into(),
            user.sieve.into(),
            user.manager.into(),
        ];
        if user.id > 0 {
            args.push(user.id.into());
            self.execute(
                "set_user",
                "UPDATE `users` SET `name` = ?, `login` = ?, `domid` = ?, `gid` = ?, `uid` = ?, \
                 `smtp` = ?, `imap` = ?, `pop3` = ?, `sieve` = ?, `manager` = ? WHERE `id` = ?",
                &args,
            )
            .await?;
        } else {
            let done = self
                .execute(
                    "set_user",
                    "INSERT INTO `users` (`name`, `login`, `domid`, `gid`, `uid`, \
                     `smtp`, `imap`, `pop3`, `sieve`, `manager`) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    &args,
                )
                .await?;
            user.id = done
                .last_insert_id
                .ok_or_else(|| ModelError::store("insert returned no id"))?;
        }

        if !user.password.is_empty() {
            self.execute(
                "set_user_password",
                "UPDATE `users` SET `passwd` = ? WHERE `id` = ?",
                &[user.password.as_str().into(), user.id.into()],
            )
            .await?;
        }
        Ok(())
    }

    async fn execute(&self, op: &str, sql: &str, args: &[Value]) -> ModelResult<Executed> {
        trace::write(op, sql, args.len());
        self.source.execute(sql, args).await.inspect_err(|err| {
            tracing::warn!(target: "mbmi.store", op, error = %err, "write failed");
        })
    }
}
