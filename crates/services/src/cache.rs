//! # TTL Cache
//!
//! Explicit cache state for the edge-gate and setup-gate probes. The
//! clock is injected so tests can expire entries deterministically
//! instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Test clock advanced by hand.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// Single-slot cache holding one value for at most `ttl`.
///
/// Process-local and unsynchronized across instances; serving stale
/// data up to the TTL is an accepted availability tradeoff.
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: RwLock<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: RwLock::new(None),
        }
    }

    /// The cached value, if one is present and not expired.
    pub fn get(&self) -> Option<T> {
        let guard = self.slot.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some((stored_at, value)) if self.clock.now().duration_since(*stored_at) < self.ttl => {
                Some(value.clone())
            }
            _ => None,
        }
    }

    pub fn put(&self, value: T) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some((self.clock.now(), value));
    }

    pub fn invalidate(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}
