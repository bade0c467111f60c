use super::error::{PipelineError, Result};
use super::model::{Dataset, DeltaSeries, SummaryStats};

/// Number of bins in the delta-time histogram.
pub const HISTOGRAM_BINS: usize = 10;

// ---------------------------------------------------------------------------
// Delta times
// ---------------------------------------------------------------------------

/// Time elapsed since the previous retained frame, per retained frame.
pub fn compute_deltas(filtered: &Dataset) -> DeltaSeries {
    let ts = filtered.timestamps();
    if ts.is_empty() {
        return DeltaSeries::default();
    }
    let mut deltas = Vec::with_capacity(ts.len());
    deltas.push(0.0);
    deltas.extend(ts.windows(2).map(|w| w[1] - w[0]));
    DeltaSeries::from(deltas)
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Mean, median, sample standard deviation, min and max of the whole delta
/// series, leading zero included.
///
/// `frames` must be aligned with `deltas`; it is only used to report where
/// the maximum occurred. Ties go to the earliest frame.
pub fn summarize(deltas: &DeltaSeries, frames: &[u64]) -> Result<SummaryStats> {
    let values = deltas.values();
    if values.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    if frames.len() != values.len() {
        return Err(PipelineError::LengthMismatch {
            stage: "summarize",
            expected: values.len(),
            actual: frames.len(),
        });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let stddev = if values.len() < 2 {
        0.0
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    let mut argmax = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[argmax] {
            argmax = i;
        }
    }

    Ok(SummaryStats {
        mean,
        median: median(values),
        stddev,
        min,
        max: values[argmax],
        argmax_frame: frames[argmax],
    })
}

/// Middle value, or the mean of the two middle values. `NaN` when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` over their own range.
    ///
    /// A single distinct value is centred in a range of width 1, and no
    /// values give the range `[0, 1]` with zero counts.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (mut lo, mut hi) = if values.is_empty() {
            (0.0, 1.0)
        } else {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for &v in values {
            let mut idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            // The division can disagree with the rounded edges by one bin.
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// `(center, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(e, &c)| ((e[0] + e[1]) / 2.0, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn timed(times: &[f64]) -> Dataset {
        times
            .iter()
            .enumerate()
            .map(|(i, &t_absolute)| Sample {
                frame: i as u64,
                angle: 1.0,
                t_absolute,
            })
            .collect()
    }

    #[test]
    fn deltas_start_at_zero() {
        let deltas = compute_deltas(&timed(&[5.0, 5.5, 7.0]));
        assert_eq!(deltas.values(), &[0.0, 0.5, 1.5]);

        assert_eq!(compute_deltas(&timed(&[3.0])).values(), &[0.0]);
        assert!(compute_deltas(&Dataset::default()).is_empty());
    }

    #[test]
    fn deltas_follow_filtered_timestamps() {
        let ds = timed(&[0.0, 0.1, 0.25, 0.4, 0.9]);
        let deltas = compute_deltas(&ds);
        assert_eq!(deltas.len(), ds.len());
        for i in 1..ds.len() {
            assert_eq!(deltas.values()[i], ds.timestamps()[i] - ds.timestamps()[i - 1]);
        }
    }

    #[test]
    fn summary_includes_leading_zero() {
        let deltas = DeltaSeries::from(vec![0.0, 0.1, 0.15, 0.15]);
        let stats = summarize(&deltas, &[0, 1, 2, 3]).unwrap();
        assert_close(stats.mean, 0.1);
        assert_close(stats.median, 0.125);
        assert_close(stats.stddev, 0.005_f64.sqrt());
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.15);
        assert_eq!(stats.argmax_frame, 2);
    }

    #[test]
    fn argmax_ties_go_to_first_occurrence() {
        let deltas = DeltaSeries::from(vec![0.0, 0.2, 0.05, 0.2]);
        let stats = summarize(&deltas, &[0, 1, 2, 3]).unwrap();
        assert_eq!(stats.max, 0.2);
        assert_eq!(stats.argmax_frame, 1);
    }

    #[test]
    fn argmax_reports_frame_number_not_index() {
        let deltas = DeltaSeries::from(vec![0.0, 0.03, 0.5, 0.04]);
        let stats = summarize(&deltas, &[10, 12, 17, 18]).unwrap();
        assert_eq!(stats.argmax_frame, 17);
    }

    #[test]
    fn single_delta_has_zero_stddev() {
        let stats = summarize(&DeltaSeries::from(vec![0.0]), &[42]).unwrap();
        assert_eq!(stats.stddev, 0.0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.argmax_frame, 42);
    }

    #[test]
    fn empty_series_is_empty_input_error() {
        let err = summarize(&DeltaSeries::default(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn misaligned_frames_are_rejected() {
        let err = summarize(&DeltaSeries::from(vec![0.0, 1.0]), &[0]).unwrap_err();
        assert!(matches!(err, PipelineError::LengthMismatch { .. }));
    }

    #[test]
    fn median_of_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn histogram_spans_value_range() {
        let h = Histogram::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0], 10);
        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.edges[0], 0.0);
        assert_eq!(h.edges[10], 10.0);
        // The maximum lands in the closed last bin.
        assert_eq!(h.counts, vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 2]);
        assert_eq!(h.counts.iter().sum::<usize>(), 11);
    }

    #[test]
    fn histogram_bins_agree_with_edges() {
        // (0.01 - 0.001) / 0.0015 floors to 6, but edges[6] is just above 0.01.
        let values = [0.001, 0.01, 0.016];
        let h = Histogram::new(&values, 10);
        assert!(h.edges[6] > 0.01);
        assert_eq!(h.counts, vec![1, 0, 0, 0, 0, 1, 0, 0, 0, 1]);

        for &v in &values {
            let bin = h.edges[..10].iter().rposition(|&e| e <= v).unwrap();
            assert!(bin == 9 || v < h.edges[bin + 1]);
            assert!(h.counts[bin] > 0, "{v} not counted in bin {bin}");
        }
    }

    #[test]
    fn histogram_degenerate_ranges() {
        let h = Histogram::new(&[0.25, 0.25], 10);
        assert_close(h.edges[0], -0.25);
        assert_close(h.edges[10], 0.75);
        assert_eq!(h.counts[5], 2);

        let h = Histogram::new(&[], 10);
        assert_eq!(h.edges[0], 0.0);
        assert_eq!(h.edges[10], 1.0);
        assert!(h.counts.iter().all(|&c| c == 0));
    }

    #[test]
    fn histogram_bars_are_bin_centres() {
        let h = Histogram::new(&[0.0, 2.0], 2);
        let bars: Vec<_> = h.bars().collect();
        assert_eq!(bars, vec![(0.5, 1), (1.5, 1)]);
        assert_eq!(h.bin_width(), 1.0);
    }
}
