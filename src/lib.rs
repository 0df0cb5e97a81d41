pub mod config;
pub mod data_loading;
pub mod detrend;
pub mod error;
pub mod filtering;
pub mod output;
pub mod spectrum;

use config::Channel;
use error::{Result, SignalError};
use ndarray::{Array2, ArrayView1};

/// Closed time interval in seconds, both ends included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !(start <= end) {
            return Err(SignalError::invalid(format!(
                "time window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a window from optional bounds, open ends extending to infinity.
    pub fn from_bounds(start: Option<f64>, end: Option<f64>) -> Result<Option<Self>> {
        match (start, end) {
            (None, None) => Ok(None),
            (s, e) => Self::new(s.unwrap_or(f64::NEG_INFINITY), e.unwrap_or(f64::INFINITY))
                .map(Some),
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Owned copy of one channel over a time range.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// Heartbeat recording: one row per sample, columns raw, processed, BPM, IBI.
#[derive(Debug, Clone)]
pub struct SignalTable {
    data: Array2<f64>,
    sample_period: f64,
}

impl SignalTable {
    pub const COLUMNS: usize = 4;

    pub fn new(data: Array2<f64>, sample_period: f64) -> Result<Self> {
        if !sample_period.is_finite() || sample_period <= 0.0 {
            return Err(SignalError::invalid(format!(
                "sample period must be positive, got {}",
                sample_period
            )));
        }
        if data.ncols() != Self::COLUMNS {
            return Err(SignalError::invalid(format!(
                "signal table needs {} columns, got {}",
                Self::COLUMNS,
                data.ncols()
            )));
        }
        Ok(Self {
            data,
            sample_period,
        })
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }

    pub fn sample_rate(&self) -> f64 {
        1.0 / self.sample_period
    }

    pub fn duration(&self) -> f64 {
        self.len() as f64 * self.sample_period
    }

    pub fn time_at(&self, idx: usize) -> f64 {
        idx as f64 * self.sample_period
    }

    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.time_at(i)).collect()
    }

    /// Index of the first sample whose time is at or after `t`, or `len()`
    /// when `t` is past the last sample.
    pub fn time_to_index(&self, t: f64) -> usize {
        let len = self.len();
        if len == 0 || !(t > 0.0) {
            return 0;
        }
        let estimate = (t / self.sample_period).ceil();
        if estimate >= len as f64 {
            return if self.time_at(len - 1) >= t { len - 1 } else { len };
        }

        // correct a one-off from rounding in the division
        let mut idx = estimate as usize;
        if self.time_at(idx) < t {
            idx += 1;
        } else if idx > 0 && self.time_at(idx - 1) >= t {
            idx -= 1;
        }
        idx.min(len)
    }

    pub fn channel(&self, channel: Channel) -> ArrayView1<'_, f64> {
        self.data.column(channel.column())
    }

    fn windowed(
        &self,
        values: impl Iterator<Item = f64>,
        window: Option<TimeWindow>,
    ) -> Series {
        let (times, values) = values
            .enumerate()
            .map(|(i, v)| (self.time_at(i), v))
            .filter(|(t, _)| window.map_or(true, |w| w.contains(*t)))
            .unzip();
        Series { times, values }
    }

    /// Copies a channel, optionally restricted to a time window.
    pub fn select(&self, channel: Channel, window: Option<TimeWindow>) -> Series {
        self.windowed(self.channel(channel).iter().copied(), window)
    }

    /// Windows a per-sample sequence derived from this table, such as a
    /// filtered channel. `values` must have one entry per row.
    pub fn select_values(&self, values: &[f64], window: Option<TimeWindow>) -> Result<Series> {
        if values.len() != self.len() {
            return Err(SignalError::invalid(format!(
                "expected {} values, one per sample, got {}",
                self.len(),
                values.len()
            )));
        }
        Ok(self.windowed(values.iter().copied(), window))
    }

    /// Turns an absolute time into a sample index relative to the start of
    /// `series`, which must have been selected from this table. The time has
    /// to fall inside the series.
    pub fn window_cutoff(&self, series: &Series, t: f64) -> Result<usize> {
        let (first, last) = match (series.times.first(), series.times.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(SignalError::invalid("cutoff requested on an empty window")),
        };
        if !(t >= first && t <= last) {
            return Err(SignalError::invalid(format!(
                "cutoff time {} is outside the window [{}, {}]",
                t, first, last
            )));
        }
        Ok(self.time_to_index(t) - self.time_to_index(first))
    }
}
