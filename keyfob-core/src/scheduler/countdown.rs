//! Countdown indicator state
//!
//! Tracks how much of the current 30-second window remains, as the live
//! view's progress indicator sees it. Between refreshes the fraction
//! drains by 1/30 per tick; the refresh arms a reset flag and the next
//! tick snaps the fraction back to the true wall-clock remainder.
//!
//! The state is owned by the scheduler task and only ever touched from
//! there, so it carries no synchronization.

use std::time::Duration;

use super::clock;
use crate::otp::STEP_SECS;

/// Drain per tick at one tick per second
const TICK_DECREMENT: f64 = 1.0 / STEP_SECS as f64;

/// Countdown fraction plus the pending-reset flag
#[derive(Debug, Clone)]
pub struct CountdownState {
    fraction: f64,
    reset_pending: bool,
}

impl CountdownState {
    /// State aligned to the wall clock at startup
    ///
    /// Started mid-window, the indicator begins at the actual remainder
    /// instead of a full bar.
    pub fn primed(now: Duration) -> Self {
        Self {
            fraction: clock::window_fraction_remaining(now),
            reset_pending: false,
        }
    }

    /// Mark that a refresh happened; the next tick snaps to full
    pub fn arm_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Advance one tick and return the updated fraction
    ///
    /// Consumes a pending reset if one is armed, otherwise drains. The
    /// fraction bottoms out at zero even if a refresh is late.
    pub fn tick(&mut self, now: Duration) -> f64 {
        if self.reset_pending {
            self.fraction = clock::window_fraction_remaining(now);
            self.reset_pending = false;
        } else {
            self.fraction = (self.fraction - TICK_DECREMENT).max(0.0);
        }
        self.fraction
    }

    /// Current fraction without advancing
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64, millis: u32) -> Duration {
        Duration::from_secs(secs) + Duration::from_millis(millis as u64)
    }

    #[test]
    fn test_primed_on_a_boundary_starts_full() {
        let state = CountdownState::primed(at(60, 0));
        assert_eq!(state.fraction(), 1.0);
    }

    #[test]
    fn test_primed_mid_window_starts_at_the_remainder() {
        // 20 seconds into the window leaves a third
        let state = CountdownState::primed(at(80, 0));
        assert!((state.fraction() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks_drain_by_one_thirtieth() {
        let mut state = CountdownState::primed(at(60, 0));

        let first = state.tick(at(61, 500));
        let second = state.tick(at(62, 500));

        assert!((first - (1.0 - 1.0 / 30.0)).abs() < 1e-9);
        assert!((second - (1.0 - 2.0 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fraction_bottoms_out_at_zero() {
        let mut state = CountdownState::primed(at(60, 0));

        let mut last = state.fraction();
        for i in 0..40 {
            last = state.tick(at(61 + i, 500));
        }

        assert_eq!(last, 0.0);
        assert_eq!(state.fraction(), 0.0);
    }

    #[test]
    fn test_armed_reset_snaps_to_the_wall_clock_remainder() {
        let mut state = CountdownState::primed(at(60, 0));
        for i in 0..5 {
            state.tick(at(61 + i, 500));
        }

        state.arm_reset();
        // Just past the 90s boundary: remainder is essentially full
        let fraction = state.tick(at(90, 500));
        assert!((fraction - (1.0 - 0.5 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_reset_is_consumed_by_a_single_tick() {
        let mut state = CountdownState::primed(at(60, 0));
        state.arm_reset();

        let snapped = state.tick(at(90, 500));
        let drained = state.tick(at(91, 500));

        assert!(drained < snapped);
        assert!((snapped - drained - TICK_DECREMENT).abs() < 1e-9);
    }
}
