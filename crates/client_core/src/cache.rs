//! Key-addressed query cache with an explicit stale/fresh flag per entry.

use std::{collections::HashMap, fmt};

use shared::domain::WeddingId;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    GuestsForWedding(WeddingId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::GuestsForWedding(wedding_id) => {
                write!(f, "/api/guests/wedding/{wedding_id}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub freshness: Freshness,
}

impl<V> CacheEntry<V> {
    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }
}

/// Each key carries a generation that every invalidation bumps, so a fetch
/// that started before a mutation cannot store its result as fresh.
pub struct QueryCache<V> {
    slots: RwLock<Slots<V>>,
}

struct Slots<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    generations: HashMap<QueryKey, u64>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(Slots {
                entries: HashMap::new(),
                generations: HashMap::new(),
            }),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry whether fresh or stale; stale data stays readable until refetched.
    pub async fn get(&self, key: QueryKey) -> Option<CacheEntry<V>> {
        self.slots.read().await.entries.get(&key).cloned()
    }

    pub async fn fresh(&self, key: QueryKey) -> Option<V> {
        self.slots
            .read()
            .await
            .entries
            .get(&key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.value.clone())
    }

    /// Current generation of `key`; take it before fetching and hand it to [`Self::put`].
    pub async fn generation(&self, key: QueryKey) -> u64 {
        self.slots
            .read()
            .await
            .generations
            .get(&key)
            .copied()
            .unwrap_or_default()
    }

    /// Stores a fetched value. It is only fresh when no invalidation happened
    /// since `generation` was read; otherwise it is kept as stale.
    pub async fn put(&self, key: QueryKey, value: V, generation: u64) -> Freshness {
        let mut slots = self.slots.write().await;
        let current = slots.generations.get(&key).copied().unwrap_or_default();
        let freshness = if current == generation {
            Freshness::Fresh
        } else {
            debug!(%key, "fetch raced an invalidation; storing as stale");
            Freshness::Stale
        };
        slots.entries.insert(key, CacheEntry { value, freshness });
        freshness
    }

    /// Marks `key` stale and bumps its generation. Returns whether an entry existed.
    pub async fn invalidate(&self, key: QueryKey) -> bool {
        let mut slots = self.slots.write().await;
        *slots.generations.entry(key).or_default() += 1;
        match slots.entries.get_mut(&key) {
            Some(entry) => {
                entry.freshness = Freshness::Stale;
                debug!(%key, "invalidated cached query");
                true
            }
            None => false,
        }
    }

    pub async fn is_stale(&self, key: QueryKey) -> bool {
        self.slots
            .read()
            .await
            .entries
            .get(&key)
            .map_or(true, |entry| !entry.is_fresh())
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
