//! Declarative exponential-backoff schedule.
//!
//! One schedule type is shared by every polling/retry site (the proof
//! verifier, the bind read-back) instead of ad hoc sleep loops. Callers
//! track their own deadline; the schedule only answers "how long until the
//! next try".

use std::time::Duration;

/// Tunable parameters for an exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each attempt.
    pub multiplier: f64,
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl BackoffSchedule {
    /// Iterator over the delay sequence, clamped at `max_delay`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut current = self.initial_delay;
        let schedule = self.clone();
        std::iter::from_fn(move || {
            let delay = current;
            current = next_delay(current, &schedule);
            Some(delay)
        })
    }
}

/// Calculate the next backoff delay from the current delay and schedule.
///
/// The result is clamped to [`BackoffSchedule::max_delay`].
pub fn next_delay(current: Duration, schedule: &BackoffSchedule) -> Duration {
    let next_ms = (current.as_millis() as f64 * schedule.multiplier) as u64;
    Duration::from_millis(next_ms).min(schedule.max_delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let schedule = BackoffSchedule::default();
        let d = next_delay(Duration::from_secs(2), &schedule);
        assert_eq!(d, Duration::from_secs(4));
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let schedule = BackoffSchedule {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        };
        let d = next_delay(Duration::from_secs(8), &schedule);
        assert_eq!(d, Duration::from_secs(10));
    }

    #[test]
    fn full_backoff_sequence() {
        let schedule = BackoffSchedule::default();
        let expected = [2, 4, 8, 16, 30, 30];
        let actual: Vec<u64> = schedule.delays().take(6).map(|d| d.as_secs()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn custom_multiplier() {
        let schedule = BackoffSchedule {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 3.0,
        };
        let actual: Vec<u64> = schedule.delays().take(4).map(|d| d.as_secs()).collect();
        assert_eq!(actual, vec![1, 3, 9, 27]);
    }
}
