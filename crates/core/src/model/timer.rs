use chrono::{DateTime, Duration, Utc};

/// Stopwatch for the question currently on screen.
///
/// Counts whole seconds and can be paused while an option is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerTimer {
    running_since: Option<DateTime<Utc>>,
    banked: Duration,
}

impl AnswerTimer {
    /// A running timer starting from zero.
    #[must_use]
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            running_since: Some(now),
            banked: Duration::zero(),
        }
    }

    /// A stopped timer showing a previously recorded time.
    #[must_use]
    pub fn stopped_at(seconds: u64) -> Self {
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        Self {
            running_since: None,
            banked: Duration::try_seconds(seconds).unwrap_or_else(Duration::zero),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Stop counting; has no effect on a paused timer.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if let Some(since) = self.running_since.take() {
            self.banked += (now - since).max(Duration::zero());
        }
    }

    /// Continue counting; has no effect on a running timer.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Whole seconds counted so far.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        let live = self
            .running_since
            .map_or_else(Duration::zero, |since| (now - since).max(Duration::zero()));
        u64::try_from((self.banked + live).num_seconds()).unwrap_or(0)
    }

    /// `MM:SS` display of the elapsed time.
    #[must_use]
    pub fn display(&self, now: DateTime<Utc>) -> String {
        format_elapsed(self.elapsed_seconds(now))
    }
}

/// Format seconds as zero-padded `MM:SS`; minutes keep growing past 59.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn pause_freezes_elapsed_time() {
        let t0 = fixed_now();
        let mut timer = AnswerTimer::start(t0);
        timer.pause(t0 + Duration::seconds(42));

        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_seconds(t0 + Duration::minutes(10)), 42);
    }

    #[test]
    fn resume_keeps_banked_time() {
        let t0 = fixed_now();
        let mut timer = AnswerTimer::start(t0);
        timer.pause(t0 + Duration::seconds(10));
        timer.resume(t0 + Duration::seconds(100));

        assert_eq!(timer.elapsed_seconds(t0 + Duration::seconds(105)), 15);
        assert_eq!(timer.display(t0 + Duration::seconds(165)), "01:15");
    }

    #[test]
    fn stopped_timer_shows_saved_time() {
        let timer = AnswerTimer::stopped_at(125);
        assert_eq!(timer.elapsed_seconds(fixed_now()), 125);
        assert_eq!(format_elapsed(3_600), "60:00");
    }
}
