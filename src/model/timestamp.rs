use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Simulation time in whole seconds since the session epoch.
///
/// Plain `u64` wrapper; natural ordering is chronological. Mission start
/// times and season bounds are expressed in this clock, never wall time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }

    /// Seconds from `earlier` to `self`, zero if `earlier` is in the future.
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn day(self) -> u64 {
        self.0 / SECONDS_PER_DAY
    }
}

impl Add<u64> for SimTime {
    type Output = SimTime;

    fn add(self, secs: u64) -> SimTime {
        SimTime(self.0 + secs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0 % SECONDS_PER_DAY;
        write!(
            f,
            "D{} {:02}:{:02}:{:02}",
            self.day(),
            secs / SECONDS_PER_HOUR,
            (secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            secs % SECONDS_PER_MINUTE
        )
    }
}
