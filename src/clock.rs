//! Clock façade (§4.A): an adjusted monotonic time with anti-jitter clamps.
//!
//! The scheduler never reads wall-clock time directly; it goes through
//! [`VirtualClock`], which tracks a `timestamp` (the last virtual second it
//! admitted) and a `timediff` (the accumulated offset between wall time and
//! virtual time). Save/restore shift `timediff` instead of touching every
//! stored deadline, so a checkpoint can be resumed after arbitrary downtime.

use crate::NO_MILLIS;

/// Wall-clock source consumed by the scheduler. Implemented by the host;
/// `raw_mtime` must be monotonic (ties to an OS monotonic clock, a vDSO read,
/// or -- in a `no_std` VM host -- a TSC/HPET read already converted to
/// seconds+milliseconds).
pub trait RawClock {
    /// Monotonic `(seconds, millis)`, millis in `0..1000`.
    fn raw_mtime(&self) -> (u32, u16);
    /// Monotonic seconds, used only to anchor the swap-rate accumulator.
    fn wall_time(&self) -> u32 {
        self.raw_mtime().0
    }
}

#[derive(Debug, Clone, Copy)]
struct Cached {
    t: u32,
    m: u16,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct VirtualClock {
    /// Last virtual second admitted; advanced one step at a time by `expire`.
    pub timestamp: u32,
    /// Offset between wall time and virtual time: `adjusted = raw - timediff`.
    pub timediff: u32,
    cached: Option<Cached>,
}

impl VirtualClock {
    pub const fn new() -> Self {
        Self {
            timestamp: 0,
            timediff: 0,
            cached: None,
        }
    }

    /// Invalidate the one-tick cache; callers that imply time has moved
    /// (`delay`, `swapcount`) must call this explicitly -- it is never
    /// inferred from other state changes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Adjusted `(seconds, millis)`, with the rules of §4.A applied in
    /// order. `has_running` disables advancing past the next scheduled
    /// deadline while callouts are mid-dispatch; `timeout` is the wheel's
    /// next non-zero deadline (0 if none).
    pub fn now(&mut self, clock: &dyn RawClock, has_running: bool, timeout: u32) -> (u32, u16) {
        if let Some(c) = self.cached {
            return (c.t + self.timediff, c.m);
        }

        let (raw_s, raw_m) = clock.raw_mtime();
        let mut t = raw_s.wrapping_sub(self.timediff);
        let mut m = raw_m;

        if t < self.timestamp {
            // Clock went backward: clamp forward, drop the sub-second part.
            t = self.timestamp;
            m = 0;
        } else if self.timestamp < t {
            if !has_running {
                if timeout == 0 || timeout > t {
                    self.timestamp = t;
                } else if self.timestamp < timeout {
                    self.timestamp = timeout - 1;
                }
            }
            if t > self.timestamp.saturating_add(60) {
                // Scheduling stall: don't let `expire` try to catch up a
                // minute of missed seconds in one call.
                t = self.timestamp.saturating_add(60);
                m = 0;
            }
        }

        self.cached = Some(Cached { t, m });
        (t + self.timediff, m)
    }

    /// `(seconds, millis)` with no sub-second component, used by `check`
    /// when initializing the timestamp for the very first callout.
    pub fn now_seconds_only(&mut self, clock: &dyn RawClock, has_running: bool, timeout: u32) -> u32 {
        let (t, _) = self.now(clock, has_running, timeout);
        t
    }
}

/// `(seconds, millis)` pair with the scheduler's "no sub-second component"
/// sentinel, used pervasively for deadlines and remaining-time results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub seconds: u32,
    pub millis: u16,
}

impl Deadline {
    pub const NONE: Deadline = Deadline {
        seconds: 0,
        millis: NO_MILLIS,
    };

    pub fn new(seconds: u32, millis: u16) -> Self {
        Self { seconds, millis }
    }
}
