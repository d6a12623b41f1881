//! Wall-clock boundary arithmetic for the scheduler
//!
//! All delays are recomputed from the wall clock at the moment of
//! scheduling, which keeps the timers pinned to Unix-epoch boundaries:
//! codes change at :00 and :30 of every minute on every host, and an
//! oversleep shortens the next delay instead of accumulating drift.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::otp::STEP_SECS;

/// Half-second offset for countdown ticks
///
/// Ticks land at x.5 seconds, between the whole-second instants where
/// the refresh fires, so the two timers never race each other visually.
const TICK_OFFSET: Duration = Duration::from_millis(500);

/// Current wall-clock time as a duration since the Unix epoch
pub fn unix_now() -> Duration {
    // A clock before the epoch behaves like the epoch itself
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}

/// Delay from `now` until the next 30-second boundary
///
/// The boundary is strictly in the future: called exactly on a boundary,
/// this returns a full step, never zero. Result is in `(0, 30]` seconds.
pub fn until_next_refresh(now: Duration) -> Duration {
    let next_boundary = (now.as_secs() / STEP_SECS + 1) * STEP_SECS;
    Duration::from_secs(next_boundary) - now
}

/// Delay from `now` until the next countdown tick
///
/// Targets the next whole second plus half a second, giving a delay in
/// `(0.5, 1.5]` seconds and a steady ~1 Hz cadence.
pub fn until_next_countdown_tick(now: Duration) -> Duration {
    Duration::from_secs(now.as_secs() + 1) + TICK_OFFSET - now
}

/// Share of the current 30-second window still remaining, in `(0, 1]`
pub fn window_fraction_remaining(now: Duration) -> f64 {
    let elapsed = now.as_secs_f64() % STEP_SECS as f64;
    1.0 - elapsed / STEP_SECS as f64
}
