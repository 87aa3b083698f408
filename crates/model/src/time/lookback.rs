use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// How far into the past a pass may reach when no recent watermark exists.
///
/// `Bounded` suits side effects that go stale (sending a notification hours
/// late is worse than not sending it). `Unbounded` suits processors that keep
/// two models in sync and must see every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Bounded(TimeDelta),
    Unbounded,
}

impl Lookback {
    /// Positive seconds beyond what `TimeDelta` can hold reach past every
    /// representable instant, so they behave as unbounded.
    pub fn from_secs(secs: i64) -> Self {
        match TimeDelta::try_seconds(secs) {
            Some(delta) => Lookback::Bounded(delta),
            None if secs < 0 => Lookback::Bounded(TimeDelta::MIN),
            None => Lookback::Unbounded,
        }
    }

    /// A bounded lookback must be strictly positive.
    pub fn is_valid(&self) -> bool {
        match self {
            Lookback::Bounded(delta) => *delta > TimeDelta::zero(),
            Lookback::Unbounded => true,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Lookback::Bounded(_))
    }

    /// Earliest start this bound allows for a window opened at `now`.
    pub fn earliest_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Lookback::Bounded(delta) => now.checked_sub_signed(*delta),
            Lookback::Unbounded => None,
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookback::Bounded(delta) => write!(f, "{}s", delta.num_seconds()),
            Lookback::Unbounded => f.write_str("unbounded"),
        }
    }
}
