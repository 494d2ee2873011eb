//! Read-only figures derived from `Counters`.

use crate::stats::accumulator::Counters;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Round to one decimal place.
#[must_use]
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of correct answers among correct and incorrect ones, rounded.
///
/// Discussed questions are left out of the denominator. Returns `0` when
/// nothing was graded correct or incorrect.
#[must_use]
pub fn accuracy(stats: &Counters) -> u32 {
    percentage(stats.correct, stats.correct.saturating_add(stats.incorrect))
}

/// Mean minutes spent per question holding a verdict, to one decimal place.
///
/// Returns `0.0` when no time was recorded or no question holds a verdict.
#[must_use]
pub fn average_time_minutes(stats: &Counters) -> f64 {
    minutes_per_item(stats.total_time_seconds, stats.answered())
}

// NOTE: counters stay far below 2^52 in practice, so the `u64 -> f64`
// conversions below are exact.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn minutes_per_item(total_seconds: u64, items: u64) -> f64 {
    if total_seconds == 0 || items == 0 {
        return 0.0;
    }
    round_tenths((total_seconds as f64 / SECONDS_PER_MINUTE) / items as f64)
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(correct: u64, incorrect: u64, discuss: u64, time: u64) -> Counters {
        Counters {
            total: correct + incorrect + discuss,
            correct,
            incorrect,
            discuss,
            total_time_seconds: time,
        }
    }

    #[test]
    fn accuracy_ignores_discuss() {
        assert_eq!(accuracy(&counters(2, 1, 0, 0)), 67);
        assert_eq!(accuracy(&counters(2, 1, 5, 0)), 67);
        assert_eq!(accuracy(&counters(1, 1, 0, 0)), 50);
    }

    #[test]
    fn accuracy_is_zero_without_graded_answers() {
        assert_eq!(accuracy(&Counters::default()), 0);
        assert_eq!(accuracy(&counters(0, 0, 4, 100)), 0);
    }

    #[test]
    fn accuracy_stays_within_bounds() {
        for correct in 0..20 {
            for incorrect in 0..20 {
                let value = accuracy(&counters(correct, incorrect, 0, 0));
                assert!(value <= 100);
                assert_eq!(value == 0, correct == 0 || correct + incorrect == 0);
            }
        }
    }

    #[test]
    fn average_time_uses_all_verdicts() {
        // 95 s over three answered questions.
        assert!((average_time_minutes(&counters(2, 1, 0, 95)) - 0.5).abs() < f64::EPSILON);
        // 360 s over two questions, one of them discussed.
        assert!((average_time_minutes(&counters(1, 0, 1, 360)) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_time_defaults_to_zero() {
        assert!(average_time_minutes(&counters(0, 0, 0, 120)).abs() < f64::EPSILON);
        assert!(average_time_minutes(&counters(3, 0, 0, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn round_tenths_rounds_half_up() {
        assert!((round_tenths(0.25) - 0.3).abs() < 1e-9);
        assert!((round_tenths(1.04) - 1.0).abs() < 1e-9);
    }
}
