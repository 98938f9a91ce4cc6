use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pattern::KeyPattern;
use crate::store::{Entry, Kind, Store, Ttl, Value};

// Every command acts on the selected keyspace and runs lazy expiry on the
// key(s) it touches before doing anything else. `now` is passed in so the
// engine stays synchronous and clock-agnostic.
impl Store {
    pub(crate) fn select_database(&mut self, db: u32) {
        self.select(db);
        debug!(db, databases = self.database_count(), "SELECT");
    }

    // ── Strings ──────────────────────────────────────────────────────────────

    pub(crate) fn set(&mut self, key: &str, value: String, now: Instant) {
        let db = self.selected();
        let ks = self.current();
        ks.expire_if_due(key, now);
        debug!(db, key, "SET");
        ks.insert(key.to_owned(), Entry::new(Value::String(value)));
    }

    pub(crate) fn get(&mut self, key: &str, now: Instant) -> Result<Option<String>> {
        let db = self.selected();
        debug!(db, key, "GET");
        match self.current().live(key, now) {
            None => Ok(None),
            Some(Entry {
                value: Value::String(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(entry) => Err(Error::wrong_type(key, Kind::String, entry.value.kind())),
        }
    }

    // ── Keys and expiry ──────────────────────────────────────────────────────

    pub(crate) fn exists(&mut self, key: &str, now: Instant) -> i64 {
        i64::from(self.current().live(key, now).is_some())
    }

    pub(crate) fn delete<K: AsRef<str>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
        now: Instant,
    ) -> usize {
        let db = self.selected();
        let ks = self.current();
        let mut removed = 0;
        for key in keys {
            let key = key.as_ref();
            ks.expire_if_due(key, now);
            if ks.remove(key).is_some() {
                removed += 1;
            }
        }
        debug!(db, removed, "DEL");
        removed
    }

    pub(crate) fn expire(&mut self, key: &str, ttl: Duration, now: Instant) -> bool {
        let db = self.selected();
        match self.current().live_mut(key, now) {
            None => false,
            Some(entry) => {
                entry.expire_in(ttl, now);
                debug!(db, key, ttl = ?ttl, "EXPIRE");
                true
            }
        }
    }

    pub(crate) fn ttl(&mut self, key: &str, now: Instant) -> Option<Ttl> {
        self.current().live(key, now).map(|e| e.ttl_at(now))
    }

    pub(crate) fn keys(&mut self, pattern: &KeyPattern, now: Instant) -> Vec<String> {
        let db = self.selected();
        let ks = self.current();
        let evicted = ks.purge_expired(now);
        let mut matched: Vec<String> = ks.keys().filter(|k| pattern.matches(k)).cloned().collect();
        matched.sort();
        debug!(db, pattern = ?pattern, matched = matched.len(), evicted, "KEYS");
        matched
    }

    // ── Hashes ───────────────────────────────────────────────────────────────

    /// A one-entry map `{field: value}`, or `None` when the key or the field
    /// is missing.
    pub(crate) fn hget(
        &mut self,
        key: &str,
        field: &str,
        now: Instant,
    ) -> Result<Option<HashMap<String, String>>> {
        match self.current().live(key, now) {
            None => Ok(None),
            Some(Entry {
                value: Value::Hash(fields),
                ..
            }) => Ok(fields
                .get(field)
                .map(|value| HashMap::from([(field.to_owned(), value.clone())]))),
            Some(entry) => Err(Error::wrong_type(key, Kind::Hash, entry.value.kind())),
        }
    }

    pub(crate) fn hgetall(
        &mut self,
        key: &str,
        now: Instant,
    ) -> Result<Option<HashMap<String, String>>> {
        match self.current().live(key, now) {
            None => Ok(None),
            Some(Entry {
                value: Value::Hash(fields),
                ..
            }) => Ok(Some(fields.clone())),
            Some(entry) => Err(Error::wrong_type(key, Kind::Hash, entry.value.kind())),
        }
    }

    pub(crate) fn hset(&mut self, key: &str, field: String, value: String, now: Instant) {
        self.hmset(key, [(field, value)], now);
    }

    pub(crate) fn hmset(
        &mut self,
        key: &str,
        pairs: impl IntoIterator<Item = (String, String)>,
        now: Instant,
    ) {
        let db = self.selected();
        let fields = self.current().hash_mut(key, now);
        fields.extend(pairs);
        debug!(db, key, fields = fields.len(), "HSET");
    }

    // ── Sets ─────────────────────────────────────────────────────────────────

    pub(crate) fn sadd(&mut self, key: &str, member: String, now: Instant) -> bool {
        let db = self.selected();
        let added = self.current().set_mut(key, now).insert(member);
        debug!(db, key, added, "SADD");
        added
    }

    pub(crate) fn sismember(&mut self, key: &str, member: &str, now: Instant) -> Result<bool> {
        match self.current().live(key, now) {
            None => Ok(false),
            Some(Entry {
                value: Value::Set(members),
                ..
            }) => Ok(members.contains(member)),
            Some(entry) => Err(Error::wrong_type(key, Kind::Set, entry.value.kind())),
        }
    }

    pub(crate) fn smembers(&mut self, key: &str, now: Instant) -> Result<Option<HashSet<String>>> {
        match self.current().live(key, now) {
            None => Ok(None),
            Some(Entry {
                value: Value::Set(members),
                ..
            }) => Ok(Some(members.clone())),
            Some(entry) => Err(Error::wrong_type(key, Kind::Set, entry.value.kind())),
        }
    }
}
