//! Clock sources for the sale engine

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::{PresaleError, PresaleResult};
use crate::math::safe_add_i64;
use crate::types::Timestamp;

/// Supplies the current unix timestamp
pub trait Clock {
    fn unix_timestamp(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as Timestamp)
            .unwrap_or_default()
    }
}

/// Manually driven clock. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move the clock by `seconds`, failing instead of wrapping
    pub fn advance(&self, seconds: i64) -> PresaleResult<Timestamp> {
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                safe_add_i64(now, seconds).ok()
            })
            .map_err(|_| PresaleError::MathOverflow)?;
        safe_add_i64(previous, seconds)
    }
}

impl Clock for ManualClock {
    fn unix_timestamp(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn unix_timestamp(&self) -> Timestamp {
        (**self).unix_timestamp()
    }
}
