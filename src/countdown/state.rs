use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remaining time, derived fresh on every tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountdownState {
    /// Not wrapped at 24; a target three days out reads 72+ hours.
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub reached: bool,
}

impl CountdownState {
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining_ms = (target - now).num_milliseconds().max(0) as u64;

        Self {
            hours: remaining_ms / 3_600_000,
            minutes: (remaining_ms / 60_000) % 60,
            seconds: (remaining_ms / 1_000) % 60,
            reached: remaining_ms == 0,
        }
    }

    pub fn terminal() -> Self {
        Self {
            reached: true,
            ..Self::default()
        }
    }
}

/// Which digit cards flip on this tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DigitFlips {
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl DigitFlips {
    /// Nothing flips on the first state, there is nothing to flip from.
    pub fn between(previous: Option<&CountdownState>, next: &CountdownState) -> Self {
        match previous {
            None => Self::default(),
            Some(prev) => Self {
                hours: prev.hours != next.hours,
                minutes: prev.minutes != next.minutes,
                seconds: prev.seconds != next.seconds,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub state: CountdownState,
    pub flips: DigitFlips,
    /// True on exactly one tick per session.
    pub just_reached: bool,
}

/// Folds clock readings into countdown states. `reached` latches: once it
/// has been reported, later readings keep returning the terminal state even
/// if the wall clock steps backwards.
#[derive(Debug, Clone)]
pub struct CountdownTracker {
    target: DateTime<Utc>,
    last: Option<CountdownState>,
    reached: bool,
}

impl CountdownTracker {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            last: None,
            reached: false,
        }
    }

    /// A tracker for a session that was already reached before mount.
    pub fn already_reached(target: DateTime<Utc>) -> Self {
        Self {
            target,
            last: Some(CountdownState::terminal()),
            reached: true,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    pub fn last(&self) -> Option<CountdownState> {
        self.last
    }

    pub fn observe(&mut self, now: DateTime<Utc>) -> Tick {
        let state = if self.reached {
            CountdownState::terminal()
        } else {
            CountdownState::between(self.target, now)
        };

        let just_reached = state.reached && !self.reached;
        self.reached |= state.reached;

        let flips = DigitFlips::between(self.last.as_ref(), &state);
        self.last = Some(state);

        Tick {
            state,
            flips,
            just_reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn target() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 30, 16, 5, 0).unwrap()
    }

    fn state(hours: u64, minutes: u64, seconds: u64) -> CountdownState {
        CountdownState {
            hours,
            minutes,
            seconds,
            reached: false,
        }
    }

    #[test]
    fn splits_remaining_time_into_fields() {
        let now = target() - ChronoDuration::seconds(3 * 3600 + 25 * 60 + 7);
        assert_eq!(CountdownState::between(target(), now), state(3, 25, 7));

        let far = target() - ChronoDuration::days(3) - ChronoDuration::seconds(1);
        assert_eq!(CountdownState::between(target(), far), state(72, 0, 1));
    }

    #[test]
    fn sub_second_remainder_is_not_reached() {
        let now = target() - ChronoDuration::milliseconds(400);
        let state = CountdownState::between(target(), now);
        assert_eq!((state.hours, state.minutes, state.seconds), (0, 0, 0));
        assert!(!state.reached);
    }

    #[test]
    fn past_target_clamps_to_zero_and_is_reached() {
        let mut tracker = CountdownTracker::new(target());
        let tick = tracker.observe(target() + ChronoDuration::hours(5));

        assert_eq!(tick.state, CountdownState::terminal());
        assert!(tick.just_reached);
        assert_eq!(tick.flips, DigitFlips::default());
    }

    #[test]
    fn flips_only_changed_fields() {
        let rollover = DigitFlips::between(Some(&state(1, 59, 59)), &state(2, 0, 0));
        assert_eq!(
            rollover,
            DigitFlips {
                hours: true,
                minutes: true,
                seconds: true
            }
        );

        let second = DigitFlips::between(Some(&state(1, 30, 10)), &state(1, 30, 9));
        assert_eq!(
            second,
            DigitFlips {
                hours: false,
                minutes: false,
                seconds: true
            }
        );

        assert_eq!(
            DigitFlips::between(None, &state(1, 30, 9)),
            DigitFlips::default()
        );
    }

    #[test]
    fn reached_latches_and_fires_once() {
        let start = target() - ChronoDuration::minutes(2);
        let mut tracker = CountdownTracker::new(target());

        let mut fired = 0;
        let mut last = tracker.observe(start);
        for second in 1..=125 {
            last = tracker.observe(start + ChronoDuration::seconds(second));
            if last.just_reached {
                fired += 1;
            }
        }

        assert_eq!(fired, 1);
        assert_eq!(last.state, CountdownState::terminal());

        // Wall clock stepping back does not un-reach the session.
        let back = tracker.observe(start);
        assert!(back.state.reached);
        assert!(!back.just_reached);
    }

    #[test]
    fn already_reached_tracker_reports_terminal_without_firing() {
        let mut tracker = CountdownTracker::already_reached(target());
        let tick = tracker.observe(target() - ChronoDuration::hours(1));
        assert!(tick.state.reached);
        assert!(!tick.just_reached);
    }
}
