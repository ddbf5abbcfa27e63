//! Process-local TTL cache.
//!
//! Used for rarely changing configuration such as AI prompts. Each process
//! holds its own copy; entries simply expire and are fetched again. The
//! clock is injected so tests can move time forward deterministically.
//!
//! Every `invalidate`/`clear` bumps a generation counter. A reader that
//! loads a value from the store takes [`TtlCache::generation`] first and
//! stores the result with [`TtlCache::insert_if_generation`], so a load that
//! raced with a write cannot put the stale value back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default time-to-live for cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

struct Slots<V> {
    entries: HashMap<String, Entry<V>>,
    generation: u64,
}

/// String-keyed cache where every entry lives for a fixed TTL.
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: Mutex<Slots<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                generation: 0,
            }),
        }
    }

    /// Cache backed by the system clock.
    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live value for `key`; an expired entry is dropped and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut slots = self.lock();
        let expired = match slots.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            slots.entries.remove(key);
        }
        None
    }

    /// Insert or replace `key`, restarting its TTL.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let expires_at = self.clock.now() + self.ttl;
        self.lock()
            .entries
            .insert(key.into(), Entry { value, expires_at });
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Insert `key` only if nothing was invalidated since `generation` was
    /// read. Returns whether the value was stored.
    pub fn insert_if_generation(&self, generation: u64, key: impl Into<String>, value: V) -> bool {
        let expires_at = self.clock.now() + self.ttl;
        let mut slots = self.lock();
        if slots.generation != generation {
            return false;
        }
        slots.entries.insert(key.into(), Entry { value, expires_at });
        true
    }

    pub fn invalidate(&self, key: &str) {
        let mut slots = self.lock();
        slots.entries.remove(key);
        slots.generation += 1;
    }

    pub fn clear(&self) {
        let mut slots = self.lock();
        slots.entries.clear();
        slots.generation += 1;
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.lock();
        let before = slots.entries.len();
        slots.entries.retain(|_, entry| entry.expires_at > now);
        before - slots.entries.len()
    }

    /// Number of stored entries, including ones that expired but were not
    /// yet purged.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Slots<V>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
