use std::collections::BTreeMap;

/// One exported sample: time in seconds relative to the measurement start,
/// plus the measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// One named time series destined for the output container.
///
/// Channels carry only the timestamps at which their signal had a value, so
/// each channel keeps its own independent time base.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub samples: Vec<Sample>,
}

/// Sparse, timestamp-indexed, signal-named sample table.
///
/// The pivot inserts `(timestamp, signal) -> value` cells one row at a time;
/// a later insert for the same pair silently overwrites the earlier one.
/// Timestamps are integer nanoseconds since the Unix epoch, so ordering and
/// duplicate detection are exact; conversion to floating-point seconds
/// happens once, at the export boundary.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    cells: BTreeMap<i64, BTreeMap<String, f64>>,
}

impl SampleTable {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Insert a cell, overwriting any previous value for the same
    /// (timestamp, signal) pair.
    pub fn insert(&mut self, timestamp_ns: i64, signal: &str, value: f64) {
        self.cells
            .entry(timestamp_ns)
            .or_default()
            .insert(signal.to_string(), value);
    }

    /// Value at an exact (timestamp, signal) pair, if present.
    pub fn get(&self, timestamp_ns: i64, signal: &str) -> Option<f64> {
        self.cells.get(&timestamp_ns)?.get(signal).copied()
    }

    /// Earliest sample timestamp in nanoseconds, if the table is non-empty.
    pub fn start_time_ns(&self) -> Option<i64> {
        self.cells.keys().next().copied()
    }

    /// Number of distinct timestamps.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of cells across all signals.
    pub fn sample_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Number of distinct signals.
    pub fn channel_count(&self) -> usize {
        self.channel_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Distinct signal names in sorted order.
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .cells
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Extract the export view: one channel per distinct signal, samples in
    /// ascending timestamp order, times in seconds relative to the earliest
    /// timestamp in the table.
    pub fn channels(&self) -> Vec<Channel> {
        let start = match self.start_time_ns() {
            Some(start) => start,
            None => return Vec::new(),
        };

        let mut channels: BTreeMap<&str, Vec<Sample>> = BTreeMap::new();
        for (&timestamp_ns, row) in &self.cells {
            let time = (timestamp_ns - start) as f64 / 1e9;
            for (signal, &value) in row {
                channels
                    .entry(signal.as_str())
                    .or_default()
                    .push(Sample { time, value });
            }
        }

        channels
            .into_iter()
            .map(|(name, samples)| Channel {
                name: name.to_string(),
                samples,
            })
            .collect()
    }
}
