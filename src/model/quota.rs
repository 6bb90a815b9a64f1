// QuotaSpec — per-source result and time budgets.

use std::time::Duration;

use crate::model::SourceId;

/// How much one source is allowed to contribute to a run.
#[derive(Debug, Clone, Copy)]
pub struct QuotaSpec {
    /// Maximum records this source may contribute after sampling.
    pub max_posts: usize,
    /// Wall-clock budget for this source's collector call.
    pub time_budget: Duration,
    /// Hard-cap sources truncate to the first `max_posts` in collector
    /// order instead of random sampling — their collectors already return
    /// a ranked top-K that over-fetching would not improve.
    pub hard_cap: bool,
}

impl QuotaSpec {
    pub fn new(max_posts: usize, time_budget: Duration, hard_cap: bool) -> Self {
        Self {
            max_posts,
            time_budget,
            hard_cap,
        }
    }

    /// Default quota for a source. YouTube enumerates a bounded top-K of
    /// search results, so it is the hard-cap source with a small limit.
    pub fn default_for(source: SourceId) -> Self {
        match source {
            SourceId::YouTube => Self::new(50, Duration::from_secs(120), true),
            _ => Self::new(1000, Duration::from_secs(120), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_defaults_to_hard_cap() {
        assert!(QuotaSpec::default_for(SourceId::YouTube).hard_cap);
        assert!(!QuotaSpec::default_for(SourceId::Quora).hard_cap);
        assert!(!QuotaSpec::default_for(SourceId::Reddit).hard_cap);
    }
}
