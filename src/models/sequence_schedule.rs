use chrono::{DateTime, Duration, Utc};

/// Delay of one step, counted from the previous step (or from enrollment
/// for the first one).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepDelay {
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
}

impl StepDelay {
    pub fn new(days: i32, hours: i32, minutes: i32) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    /// Negative components count as zero.
    pub fn duration(&self) -> Duration {
        Duration::days(i64::from(self.days.max(0)))
            + Duration::hours(i64::from(self.hours.max(0)))
            + Duration::minutes(i64::from(self.minutes.max(0)))
    }
}

/// Offset of each step from enrollment: step `i` is due after the sum of
/// the delays of steps `0..=i`.
pub fn cumulative_offsets(delays: &[StepDelay]) -> Vec<Duration> {
    delays
        .iter()
        .scan(Duration::zero(), |acc, delay| {
            *acc += delay.duration();
            Some(*acc)
        })
        .collect()
}

pub fn total_duration(delays: &[StepDelay]) -> Duration {
    delays.iter().map(StepDelay::duration).fold(Duration::zero(), |a, b| a + b)
}

/// When step `index` falls due for an enrollment started at `enrolled_at`.
/// `None` past the last step.
pub fn due_at(enrolled_at: DateTime<Utc>, delays: &[StepDelay], index: usize) -> Option<DateTime<Utc>> {
    cumulative_offsets(delays)
        .get(index)
        .map(|offset| enrolled_at + *offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offsets_accumulate() {
        let delays = [
            StepDelay::new(0, 0, 0),
            StepDelay::new(2, 0, 0),
            StepDelay::new(0, 4, 30),
        ];
        let offsets = cumulative_offsets(&delays);
        assert_eq!(offsets[0], Duration::zero());
        assert_eq!(offsets[1], Duration::days(2));
        assert_eq!(offsets[2], Duration::days(2) + Duration::minutes(270));
        assert_eq!(total_duration(&delays), offsets[2]);
    }

    #[test]
    fn due_at_is_none_past_last_step() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let delays = [StepDelay::new(1, 0, 0)];
        assert_eq!(
            due_at(start, &delays, 0),
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap())
        );
        assert_eq!(due_at(start, &delays, 1), None);
    }

    #[test]
    fn negative_delays_count_as_zero() {
        assert_eq!(StepDelay::new(-1, -2, 5).duration(), Duration::minutes(5));
    }
}
