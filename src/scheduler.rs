use chrono::{DateTime, Duration, Utc};

use crate::settings::{validate_interval, Settings};

/// Run state of the reminder loop. A deadline exists exactly while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Paused,
    Running { next_fire: DateTime<Utc> },
}

impl SchedulerState {
    pub fn is_running(&self) -> bool {
        matches!(self, SchedulerState::Running { .. })
    }

    pub fn next_fire(&self) -> Option<DateTime<Utc>> {
        match self {
            SchedulerState::Running { next_fire } => Some(*next_fire),
            SchedulerState::Paused => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SchedulerState::Running { .. } => "Running",
            SchedulerState::Paused => "Paused",
        }
    }
}

/// Time left until the next reminder, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Paused,
    Remaining(u64),
}

#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    state: SchedulerState,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderScheduler {
    /// Starts paused; callers normally `start` right away.
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Paused,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn next_fire(&self) -> Option<DateTime<Utc>> {
        self.state.next_fire()
    }

    pub fn start(&mut self, settings: &Settings, now: DateTime<Utc>) {
        self.state = SchedulerState::Running {
            next_fire: deadline_from(now, settings),
        };
    }

    pub fn pause(&mut self) {
        self.state = SchedulerState::Paused;
    }

    /// Returns whether the scheduler is running afterwards.
    pub fn toggle(&mut self, settings: &Settings, now: DateTime<Utc>) -> bool {
        if self.is_running() {
            self.pause();
        } else {
            self.start(settings, now);
        }
        self.is_running()
    }

    /// Validates `raw`, stores it in `settings` and, when running, restarts
    /// the countdown from `now`.
    pub fn set_interval(&mut self, settings: &mut Settings, raw: &str, now: DateTime<Utc>) -> u32 {
        let minutes = validate_interval(raw);
        settings.interval_minutes = minutes;
        if self.is_running() {
            self.start(settings, now);
        }
        minutes
    }

    /// Due check for one tick. Returns `true` when a reminder should fire, in
    /// which case the next deadline has already been moved to
    /// `now + interval`.
    pub fn poll(&mut self, now: DateTime<Utc>, settings: &Settings) -> bool {
        match self.state {
            SchedulerState::Running { next_fire } if now >= next_fire => {
                self.start(settings, now);
                true
            }
            _ => false,
        }
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Countdown {
        match self.state {
            SchedulerState::Running { next_fire } => {
                let secs = (next_fire - now).num_seconds().max(0);
                Countdown::Remaining(secs as u64)
            }
            SchedulerState::Paused => Countdown::Paused,
        }
    }
}

fn deadline_from(now: DateTime<Utc>, settings: &Settings) -> DateTime<Utc> {
    now + Duration::seconds(settings.interval_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn settings(minutes: u32) -> Settings {
        Settings {
            interval_minutes: minutes,
            ..Settings::default()
        }
    }

    #[test]
    fn start_sets_deadline_one_interval_ahead() {
        for minutes in [1, 5, 30, 240] {
            let mut scheduler = ReminderScheduler::new();
            scheduler.start(&settings(minutes), t(0));
            assert_eq!(scheduler.next_fire(), Some(t(60 * i64::from(minutes))));
        }
    }

    #[test]
    fn start_while_running_recomputes() {
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&settings(1), t(0));
        scheduler.start(&settings(1), t(10));
        assert_eq!(scheduler.next_fire(), Some(t(70)));
    }

    #[test]
    fn pause_twice_is_the_same_as_once() {
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&settings(1), t(0));
        scheduler.pause();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.next_fire(), None);
        scheduler.pause();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.next_fire(), None);
    }

    #[test]
    fn toggle_flips_state() {
        let mut scheduler = ReminderScheduler::new();
        let s = settings(2);
        assert!(scheduler.toggle(&s, t(0)));
        assert_eq!(scheduler.next_fire(), Some(t(120)));
        assert!(!scheduler.toggle(&s, t(5)));
        assert_eq!(scheduler.next_fire(), None);
    }

    #[test]
    fn set_interval_restarts_countdown_from_now() {
        let mut scheduler = ReminderScheduler::new();
        let mut s = settings(30);
        scheduler.start(&s, t(0));

        let minutes = scheduler.set_interval(&mut s, "5", t(100));
        assert_eq!(minutes, 5);
        assert_eq!(s.interval_minutes, 5);
        assert_eq!(scheduler.next_fire(), Some(t(400)));
    }

    #[test]
    fn set_interval_while_paused_stays_paused() {
        let mut scheduler = ReminderScheduler::new();
        let mut s = settings(30);

        assert_eq!(scheduler.set_interval(&mut s, "abc", t(0)), 30);
        assert_eq!(scheduler.set_interval(&mut s, "-5", t(0)), 1);
        assert_eq!(s.interval_minutes, 1);
        assert_eq!(scheduler.state(), SchedulerState::Paused);
    }

    #[test]
    fn paused_poll_never_fires() {
        let mut scheduler = ReminderScheduler::new();
        assert!(!scheduler.poll(t(1_000_000), &settings(1)));
    }

    #[test]
    fn fires_once_per_interval_boundary() {
        let s = settings(1);
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&s, t(0));

        let fired: Vec<i64> = (0..=185)
            .filter(|&secs| scheduler.poll(t(secs), &s))
            .collect();
        assert_eq!(fired, vec![60, 120, 180]);
    }

    #[test]
    fn irregular_ticks_fire_on_first_tick_past_deadline() {
        let s = settings(1);
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&s, t(0));

        assert!(!scheduler.poll(t(30), &s));
        assert!(!scheduler.poll(t(59), &s));
        assert!(scheduler.poll(t(62), &s));
        assert_eq!(scheduler.next_fire(), Some(t(122)));
        assert!(!scheduler.poll(t(63), &s));
    }

    #[test]
    fn overdue_after_sleep_fires_once() {
        let s = settings(1);
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&s, t(0));

        assert!(scheduler.poll(t(3_600), &s));
        assert!(!scheduler.poll(t(3_601), &s));
        assert_eq!(scheduler.next_fire(), Some(t(3_660)));
    }

    #[test]
    fn remaining_seconds_is_clamped() {
        let mut scheduler = ReminderScheduler::new();
        assert_eq!(scheduler.remaining_seconds(t(0)), Countdown::Paused);

        scheduler.start(&settings(1), t(0));
        assert_eq!(scheduler.remaining_seconds(t(0)), Countdown::Remaining(60));
        assert_eq!(scheduler.remaining_seconds(t(59)), Countdown::Remaining(1));
        assert_eq!(scheduler.remaining_seconds(t(90)), Countdown::Remaining(0));
    }
}
