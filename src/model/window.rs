// DateWindow — the inclusive UTC date range every emitted post must fall in.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CollectError;

/// Inclusive begin/end bounds, UTC. Constructed once per run and shared
/// by every collector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Build a window, rejecting an inverted range before any network call.
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CollectError> {
        if begin > end {
            return Err(CollectError::Configuration {
                message: format!("invalid date window: begin {begin} is after end {end}"),
            });
        }
        Ok(Self { begin, end })
    }

    /// Window covering the last `days` days, ending now.
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            begin: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.begin <= ts && ts <= self.end
    }

    /// Window span in whole seconds (at least 1, for spread arithmetic).
    pub fn span_seconds(&self) -> i64 {
        (self.end - self.begin).num_seconds().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_inverted_range() {
        let a = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = DateWindow::new(a, b).unwrap_err();
        assert!(matches!(err, CollectError::Configuration { .. }));
    }

    #[test]
    fn bounds_are_inclusive() {
        let begin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let w = DateWindow::new(begin, end).unwrap();
        assert!(w.contains(begin));
        assert!(w.contains(end));
        assert!(!w.contains(end + Duration::seconds(1)));
        assert!(!w.contains(begin - Duration::seconds(1)));
    }

    #[test]
    fn last_days_spans_requested_period() {
        let w = DateWindow::last_days(7);
        assert!((w.end - w.begin).num_days() >= 6);
        assert!(w.begin <= w.end);
    }
}
