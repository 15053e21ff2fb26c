use super::Summary;

/// Run of occurrences whose consecutive gaps all stay within the period bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
    /// Largest gap between consecutive occurrences inside the run
    pub gap: u64,
    pub count: u64,
}

impl Interval {
    pub fn point(timestamp: u64) -> Self {
        Self {
            start: timestamp,
            end: timestamp,
            gap: 0,
            count: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodParams {
    pub max_period: u64,
    /// Last timestamp of the database
    pub horizon: u64,
}

/// Compacted occurrence timestamps.
///
/// Canonical form: intervals ascend by start, and any two neighbors are more
/// than `max_period` apart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntervalSummary {
    intervals: Vec<Interval>,
}

impl IntervalSummary {
    pub fn point(timestamp: u64) -> Self {
        Self {
            intervals: vec![Interval::point(timestamp)],
        }
    }

    /// Canonical summary of arbitrary (unsorted) timestamps.
    pub fn from_timestamps(timestamps: &[u64], max_period: u64) -> Self {
        let mut sorted = timestamps.to_vec();
        sorted.sort_unstable();
        let mut intervals = Vec::new();
        for timestamp in sorted {
            push_coalesced(&mut intervals, Interval::point(timestamp), max_period);
        }
        Self { intervals }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Largest gap between consecutive occurrences, counting the gap from the
    /// time origin to the first occurrence and from the last one to the horizon.
    pub fn period(&self, params: &PeriodParams) -> u64 {
        let mut period = 0;
        let mut cursor = 0;
        for interval in &self.intervals {
            period = period
                .max(interval.start.saturating_sub(cursor))
                .max(interval.gap);
            cursor = interval.end;
        }
        period.max(params.horizon.saturating_sub(cursor))
    }

    /// `period() <= max_period`, stopping at the first violating gap.
    pub fn is_periodic(&self, params: &PeriodParams) -> bool {
        let mut cursor = 0;
        for interval in &self.intervals {
            if interval.start.saturating_sub(cursor) > params.max_period
                || interval.gap > params.max_period
            {
                return false;
            }
            cursor = interval.end;
        }
        !self.intervals.is_empty() && params.horizon.saturating_sub(cursor) <= params.max_period
    }
}

/// Appends `next` (whose start is not before the last start) and coalesces it
/// into the last interval when the bridging gap is within `max_period`.
fn push_coalesced(intervals: &mut Vec<Interval>, next: Interval, max_period: u64) {
    if let Some(last) = intervals.last_mut() {
        let bridge = next.start.saturating_sub(last.end);
        if bridge <= max_period {
            last.end = last.end.max(next.end);
            last.gap = last.gap.max(next.gap).max(bridge);
            last.count += next.count;
            return;
        }
    }
    intervals.push(next);
}

impl Summary for IntervalSummary {
    type Params = PeriodParams;
    type Support = u64;

    fn singleton(timestamp: u64, _probability: f64) -> Self {
        Self::point(timestamp)
    }

    fn tail(timestamp: u64, _probabilities: &[f64]) -> Self {
        Self::point(timestamp)
    }

    fn merge(&mut self, other: &Self, params: &PeriodParams) {
        if other.intervals.is_empty() {
            return;
        }
        if self.intervals.is_empty() {
            self.intervals = other.intervals.clone();
            return;
        }

        let (left, right) = (&self.intervals, &other.intervals);
        let mut merged = Vec::with_capacity(left.len() + right.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() || j < right.len() {
            let next = if j == right.len() || (i < left.len() && left[i].start <= right[j].start) {
                i += 1;
                left[i - 1]
            } else {
                j += 1;
                right[j - 1]
            };
            push_coalesced(&mut merged, next, params.max_period);
        }
        self.intervals = merged;
    }

    fn support(&self) -> u64 {
        self.intervals.iter().map(|interval| interval.count).sum()
    }

    fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
