//! The public command surface.
//!
//! [`Client`] mirrors the calling convention of an asynchronous network client:
//! every command is an `async fn` returning [`Result`]. Nothing ever awaits
//! I/O, so each future completes on its first poll. The storage engine behind
//! it is entirely synchronous and owned by this one client.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::pattern::KeyPattern;
use crate::store::{Store, Ttl};
use crate::telemetry::{COMMAND_DURATION_SECONDS, KEYS_TOTAL};

/// An in-memory stand-in for a Redis client connection.
///
/// Each client owns its own databases; two clients never see each other's
/// keys.
///
/// ```
/// use kvdouble::{Client, Config};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), kvdouble::Error> {
/// let mut client = Client::new(Config::default());
/// client.set("greeting", "hello").await?;
/// assert_eq!(client.get("greeting").await?, Some("hello".to_owned()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    store: Store,
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Self {
        if config.password.is_some() {
            debug!(db = config.database, "password supplied; authentication is not enforced");
        }
        Self {
            store: Store::new(config.database),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The currently selected database index.
    pub fn database(&self) -> u32 {
        self.store.selected()
    }

    fn observe<T>(&mut self, command: &'static str, op: impl FnOnce(&mut Store, Instant) -> T) -> T {
        let start = Instant::now();
        let out = op(&mut self.store, start);
        metrics::histogram!(COMMAND_DURATION_SECONDS, "command" => command)
            .record(start.elapsed().as_secs_f64());
        let db = self.store.selected();
        let keys = self.store.current().len();
        metrics::gauge!(KEYS_TOTAL, "db" => db.to_string()).set(keys as f64);
        out
    }

    /// Switches to database `db`, creating it empty on first use.
    pub async fn select_database(&mut self, db: u32) -> Result<()> {
        self.observe("select", |store, _| store.select_database(db));
        Ok(())
    }

    /// Stores the textual form of `value`, replacing whatever `key` held
    /// (including its expiry).
    pub async fn set(&mut self, key: &str, value: impl ToString) -> Result<()> {
        let value = value.to_string();
        self.observe("set", |store, now| store.set(key, value, now));
        Ok(())
    }

    /// Fails with [`Error::TypeMismatch`](crate::Error::TypeMismatch) if `key`
    /// holds a hash or a set.
    pub async fn get(&mut self, key: &str) -> Result<Option<String>> {
        self.observe("get", |store, now| store.get(key, now))
    }

    /// `1` if `key` exists, `0` otherwise.
    pub async fn exists(&mut self, key: &str) -> Result<i64> {
        Ok(self.observe("exists", |store, now| store.exists(key, now)))
    }

    /// Removes every listed key that exists and returns how many were removed.
    pub async fn delete<I>(&mut self, keys: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Ok(self.observe("del", |store, now| store.delete(keys, now)))
    }

    /// Sets `key` to expire `ttl_secs` seconds from now, replacing any
    /// earlier deadline. Returns `false`, and sets nothing, if `key` is absent.
    pub async fn expire(&mut self, key: &str, ttl_secs: u64) -> Result<bool> {
        let ttl = Duration::from_secs(ttl_secs);
        Ok(self.observe("expire", |store, now| store.expire(key, ttl, now)))
    }

    /// `None` if `key` is absent, [`Ttl::Persistent`] if it has no expiry.
    pub async fn ttl(&mut self, key: &str) -> Result<Option<Ttl>> {
        Ok(self.observe("ttl", |store, now| store.ttl(key, now)))
    }

    /// Lists the keys of the selected database matching `pattern`; see
    /// [`KeyPattern`] for the supported syntax. Expired keys are swept first.
    /// Callers should not rely on the order of the result.
    pub async fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        let pattern = KeyPattern::parse(pattern);
        Ok(self.observe("keys", |store, now| store.keys(&pattern, now)))
    }

    /// Returns `{field: value}` as a one-entry map, or `None` when the key or
    /// the field is missing.
    pub async fn hget(
        &mut self,
        key: &str,
        field: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        self.observe("hget", |store, now| store.hget(key, field, now))
    }

    pub async fn hgetall(&mut self, key: &str) -> Result<Option<HashMap<String, String>>> {
        self.observe("hgetall", |store, now| store.hgetall(key, now))
    }

    /// Sets one hash field. A key holding a string or a set is replaced by a
    /// new hash.
    pub async fn hset(&mut self, key: &str, field: &str, value: impl ToString) -> Result<()> {
        let (field, value) = (field.to_owned(), value.to_string());
        self.observe("hset", |store, now| store.hset(key, field, value, now));
        Ok(())
    }

    /// Sets several hash fields in one step, with the same replacement rule
    /// as [`hset`](Self::hset).
    pub async fn hmset<I, F, V>(&mut self, key: &str, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: ToString,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(f, v)| (f.into(), v.to_string()))
            .collect();
        self.observe("hmset", |store, now| store.hmset(key, pairs, now));
        Ok(())
    }

    /// Adds `member` to the set at `key`, replacing a string or hash with a
    /// new set. Returns `true` if the member was not already present.
    pub async fn sadd(&mut self, key: &str, member: impl ToString) -> Result<bool> {
        let member = member.to_string();
        Ok(self.observe("sadd", |store, now| store.sadd(key, member, now)))
    }

    /// `false` both for a missing key and for a missing member.
    pub async fn sismember(&mut self, key: &str, member: &str) -> Result<bool> {
        self.observe("sismember", |store, now| store.sismember(key, member, now))
    }

    pub async fn smembers(&mut self, key: &str) -> Result<Option<HashSet<String>>> {
        self.observe("smembers", |store, now| store.smembers(key, now))
    }
}
