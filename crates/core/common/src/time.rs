//! Time-of-day values anchored at local midnight
//!
//! Several exchange feeds stamp messages with nanoseconds since the trading
//! day's midnight rather than since the Unix epoch. [`TimeOfDay`] carries
//! that origin explicitly so the two clocks cannot be mixed up silently.

use crate::types::Ts;
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nanoseconds elapsed since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay(u64);

const NANOS_PER_SEC: u64 = 1_000_000_000;

impl TimeOfDay {
    /// Current local time of day.
    #[must_use]
    pub fn now() -> Self {
        let now = chrono::Local::now().time();
        let nanos =
            u64::from(now.num_seconds_from_midnight()) * NANOS_PER_SEC + u64::from(now.nanosecond());
        Self(nanos)
    }

    /// Create from raw nanoseconds since midnight.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Raw nanoseconds since midnight.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Re-anchor an epoch timestamp against the given midnight.
    ///
    /// Returns zero if `ts` precedes `midnight`.
    #[must_use]
    pub const fn from_ts(ts: Ts, midnight: Ts) -> Self {
        Self(ts.as_nanos().saturating_sub(midnight.as_nanos()))
    }

    /// Convert back to an epoch timestamp given the same midnight anchor.
    #[must_use]
    pub const fn into_ts(self, midnight: Ts) -> Ts {
        Ts::from_nanos(midnight.as_nanos() + self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 / NANOS_PER_SEC;
        let sub = self.0 % NANOS_PER_SEC;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:09}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            sub
        )
    }
}
