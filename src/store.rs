use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::telemetry::EXPIRED_KEYS_TOTAL;

/// The shape of a stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Hash,
    Set,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::String => "string",
            Kind::Hash => "hash",
            Kind::Set => "set",
        })
    }
}

/// Remaining lifetime of a key, as reported by `TTL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ttl {
    /// The key exists and carries no expiry.
    Persistent,
    /// Whole seconds until the key expires, rounded up.
    Seconds(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Value {
    String(String),
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
}

impl Value {
    pub(crate) fn empty(kind: Kind) -> Self {
        match kind {
            Kind::String => Value::String(String::new()),
            Kind::Hash => Value::Hash(HashMap::new()),
            Kind::Set => Value::Set(HashSet::new()),
        }
    }

    pub(crate) fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Hash(_) => Kind::Hash,
            Value::Set(_) => Kind::Set,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) value: Value,
    pub(crate) expiry: Option<Instant>,
}

impl Entry {
    pub(crate) fn new(value: Value) -> Self {
        Self { value, expiry: None }
    }

    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        self.expiry.is_some_and(|e| now >= e)
    }

    pub(crate) fn ttl_at(&self, now: Instant) -> Ttl {
        match self.expiry {
            None => Ttl::Persistent,
            Some(e) => {
                let left = e.saturating_duration_since(now);
                let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
                Ttl::Seconds(secs)
            }
        }
    }

    /// Sets the deadline `ttl` after `now`. A deadline past the clock's range
    /// can never be reached, so the entry is left without an expiry instead.
    pub(crate) fn expire_in(&mut self, ttl: Duration, now: Instant) {
        self.expiry = now.checked_add(ttl);
    }
}

/// All entries of one database index. Expiry is stored on the entry itself,
/// so a key can never carry an expiry without also holding a value.
#[derive(Debug, Default)]
pub(crate) struct Keyspace {
    entries: HashMap<String, Entry>,
}

impl Keyspace {
    /// Lazy expiry: drop `key` if its deadline has passed. Returns true if the
    /// key was evicted.
    pub(crate) fn expire_if_due(&mut self, key: &str, now: Instant) -> bool {
        if !self.entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
            return false;
        }
        self.entries.remove(key);
        debug!(key, "expiring key");
        metrics::counter!(EXPIRED_KEYS_TOTAL).increment(1);
        true
    }

    /// Sweep every expired key. Returns how many were evicted.
    pub(crate) fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let expired = entry.is_expired_at(now);
            if expired {
                debug!(key = %key, "expiring key");
            }
            !expired
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            metrics::counter!(EXPIRED_KEYS_TOTAL).increment(evicted as u64);
        }
        evicted
    }

    pub(crate) fn live(&mut self, key: &str, now: Instant) -> Option<&Entry> {
        self.expire_if_due(key, now);
        self.entries.get(key)
    }

    pub(crate) fn live_mut(&mut self, key: &str, now: Instant) -> Option<&mut Entry> {
        self.expire_if_due(key, now);
        self.entries.get_mut(key)
    }

    /// Returns the live entry for `key`, creating it empty or replacing it
    /// with a fresh empty entry when its shape is not `kind`.
    pub(crate) fn shaped(&mut self, key: &str, kind: Kind, now: Instant) -> &mut Entry {
        self.expire_if_due(key, now);
        let entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::new(Value::empty(kind)));
        if entry.value.kind() != kind {
            debug!(key, found = %entry.value.kind(), wanted = %kind, "replacing wrongly typed entry");
            *entry = Entry::new(Value::empty(kind));
        }
        entry
    }

    /// The hash at `key`, created or swapped in per [`shaped`](Self::shaped).
    pub(crate) fn hash_mut(&mut self, key: &str, now: Instant) -> &mut HashMap<String, String> {
        match &mut self.shaped(key, Kind::Hash, now).value {
            Value::Hash(fields) => fields,
            other => unreachable!("shaped returned a {} entry for a hash write", other.kind()),
        }
    }

    /// The set at `key`, created or swapped in per [`shaped`](Self::shaped).
    pub(crate) fn set_mut(&mut self, key: &str, now: Instant) -> &mut HashSet<String> {
        match &mut self.shaped(key, Kind::Set, now).value {
            Value::Set(members) => members,
            other => unreachable!("shaped returned a {} entry for a set write", other.kind()),
        }
    }

    pub(crate) fn insert(&mut self, key: String, entry: Entry) {
        self.entries.insert(key, entry);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Database index → keyspace, plus the currently selected index.
#[derive(Debug)]
pub(crate) struct Store {
    keyspaces: HashMap<u32, Keyspace>,
    selected: u32,
}

impl Store {
    pub(crate) fn new(db: u32) -> Self {
        let mut keyspaces = HashMap::new();
        keyspaces.insert(db, Keyspace::default());
        Self {
            keyspaces,
            selected: db,
        }
    }

    pub(crate) fn select(&mut self, db: u32) {
        self.selected = db;
        self.keyspaces.entry(db).or_default();
    }

    pub(crate) fn selected(&self) -> u32 {
        self.selected
    }

    pub(crate) fn current(&mut self) -> &mut Keyspace {
        self.keyspaces.entry(self.selected).or_default()
    }

    pub(crate) fn database_count(&self) -> usize {
        self.keyspaces.len()
    }
}
