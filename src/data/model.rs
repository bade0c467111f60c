use serde::Deserialize;

use super::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Sample – one row of the measurement table
// ---------------------------------------------------------------------------

/// A single measurement: one processed video frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Sample {
    /// Frame index, monotonic.
    pub frame: u64,
    /// Slip angle in degrees. `0.0` means no angle was detected.
    pub angle: f64,
    /// Absolute timestamp in seconds, non-decreasing.
    pub t_absolute: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the ordered table, stored column-wise
// ---------------------------------------------------------------------------

/// Ordered samples stored as three parallel columns.
///
/// The columns are private so they can only grow together; every accessor
/// returns slices of the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    frames: Vec<u64>,
    angles: Vec<f64>,
    timestamps: Vec<f64>,
}

impl Dataset {
    pub fn with_capacity(capacity: usize) -> Self {
        Dataset {
            frames: Vec::with_capacity(capacity),
            angles: Vec::with_capacity(capacity),
            timestamps: Vec::with_capacity(capacity),
        }
    }

    /// Build a dataset from three columns, rejecting ragged input.
    pub fn from_columns(frames: Vec<u64>, angles: Vec<f64>, timestamps: Vec<f64>) -> Result<Self> {
        for (len, what) in [(angles.len(), "angle"), (timestamps.len(), "t_absolute")] {
            if len != frames.len() {
                return Err(PipelineError::format(format!(
                    "column '{what}' has {len} values but 'frame' has {}",
                    frames.len()
                )));
            }
        }
        Ok(Dataset {
            frames,
            angles,
            timestamps,
        })
    }

    pub fn push(&mut self, sample: Sample) {
        self.frames.push(sample.frame);
        self.angles.push(sample.angle);
        self.timestamps.push(sample.t_absolute);
    }

    pub fn frames(&self) -> &[u64] {
        &self.frames
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.frames
            .iter()
            .zip(&self.angles)
            .zip(&self.timestamps)
            .map(|((&frame, &angle), &t_absolute)| Sample {
                frame,
                angle,
                t_absolute,
            })
    }

    /// Split back into `(frames, angles, timestamps)`.
    pub fn into_columns(self) -> (Vec<u64>, Vec<f64>, Vec<f64>) {
        (self.frames, self.angles, self.timestamps)
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut dataset = Dataset::with_capacity(iter.size_hint().0);
        for sample in iter {
            dataset.push(sample);
        }
        dataset
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Inclusive angle range outside of which a sample counts as an outlier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBounds {
    pub lower: f64,
    pub upper: f64,
}

impl FilterBounds {
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.lower && angle <= self.upper
    }
}

/// Elapsed time between consecutive retained frames.
///
/// Element 0 is always `0.0`: the first retained frame has no predecessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaSeries(Vec<f64>);

impl DeltaSeries {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Deltas with the defined-zero first element removed.
    pub fn measured(&self) -> &[f64] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for DeltaSeries {
    fn from(values: Vec<f64>) -> Self {
        DeltaSeries(values)
    }
}

/// Descriptive statistics of a [`DeltaSeries`], in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (divisor `n - 1`); `0.0` below two values.
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    /// Frame at the first position holding `max`.
    pub argmax_frame: u64,
}
