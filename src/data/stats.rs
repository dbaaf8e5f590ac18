//! Aggregate statistics over the session buffer.

use serde::Serialize;

use super::buffer::SessionBuffer;

/// Summary statistics for the readings received so far.
///
/// Recomputed from scratch on every frame. All fields are zero when there
/// are no readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    pub max: f64,
    pub min: f64,
    pub avg: f64,
    pub current: f64,
}

impl Statistics {
    /// Compute statistics over values ordered oldest first.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        let mut stats = Self {
            max: first,
            min: first,
            avg: 0.0,
            current: first,
        };
        let mut sum = first;
        let mut count = 1usize;

        for value in iter {
            stats.max = stats.max.max(value);
            stats.min = stats.min.min(value);
            stats.current = value;
            sum += value;
            count += 1;
        }

        stats.avg = sum / count as f64;
        stats
    }

    /// Compute statistics over every reading in the buffer.
    pub fn from_buffer(buffer: &SessionBuffer) -> Self {
        Self::from_values(buffer.values())
    }

    /// Average formatted with one decimal place, as shown in the UI.
    pub fn avg_label(&self) -> String {
        format!("{:.1}", self.avg)
    }
}
