use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use std::fmt;

/// Distance kept between "now" and the end of a scan window.
///
/// A record's change timestamp refers to a moment at which the change is not
/// yet visible to readers in general, so windows never reach closer to the
/// present than this. Configuration can widen the buffer but never shrink it
/// below [`VisibilityBuffer::FLOOR_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisibilityBuffer(TimeDelta);

impl VisibilityBuffer {
    /// Hard minimum in seconds.
    pub const FLOOR_SECS: i64 = 60;

    pub fn floor() -> Self {
        VisibilityBuffer(TimeDelta::seconds(Self::FLOOR_SECS))
    }

    /// Builds a buffer from a configured value, raising it to the floor if needed.
    pub fn new(configured: TimeDelta) -> Self {
        Self::floor().max(VisibilityBuffer(configured))
    }

    pub fn from_secs(secs: i64) -> Self {
        match TimeDelta::try_seconds(secs) {
            Some(delta) => Self::new(delta),
            None if secs > 0 => VisibilityBuffer(TimeDelta::MAX),
            None => Self::floor(),
        }
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }

    /// Latest instant a window opened at `now` may cover, at microsecond precision.
    pub fn finish_for(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.trunc_subsecs(6)
            .checked_sub_signed(self.0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for VisibilityBuffer {
    fn default() -> Self {
        Self::floor()
    }
}

impl fmt::Display for VisibilityBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.num_seconds())
    }
}
