//! Rolling session buffer of readings.

use std::collections::VecDeque;

use super::reading::Reading;

/// Default number of readings kept for the session.
pub const DEFAULT_CAPACITY: usize = 3600;

/// Number of most recent readings handed to the chart.
pub const CHART_WINDOW: usize = 5;

/// Ordered readings received during this session.
///
/// Values and timestamps live in the same [`Reading`], so they cannot
/// drift out of alignment. Once `capacity` readings are stored, each new
/// reading evicts the oldest one.
#[derive(Debug, Clone)]
pub struct SessionBuffer {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl Default for SessionBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

/// A single point on the heart-rate chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// X-axis label (local time of the reading).
    pub label: String,
    /// Heart rate in bpm.
    pub value: f64,
}

impl SessionBuffer {
    /// Create an empty buffer holding at most `capacity` readings.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest if the buffer is full.
    pub fn push(&mut self, reading: Reading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// The most recent reading.
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate readings oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Heart-rate values oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.value)
    }

    /// The last `n` readings, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Reading> {
        self.readings.iter().skip(self.readings.len().saturating_sub(n))
    }

    /// Chart input: the last [`CHART_WINDOW`] readings as labelled points.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.recent(CHART_WINDOW)
            .map(|r| ChartPoint {
                label: r.time_label(),
                value: r.value,
            })
            .collect()
    }
}
