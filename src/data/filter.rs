use super::model::{Dataset, FilterBounds};

/// Whisker length of the interquartile-range outlier rule.
pub const IQR_WHISKER: f64 = 1.5;

/// Angle written by the tracker when it could not compute one.
pub const NO_DETECTION: f64 = 0.0;

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

/// `p`-th percentile (`0..=100`) with linear interpolation between the two
/// nearest ranks, matching NumPy's default.
///
/// Returns `NaN` for empty input.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    match n {
        0 => f64::NAN,
        1 => sorted[0],
        _ => {
            let h = (n - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
            let j = h.floor() as usize;
            let g = h - h.floor();
            if j + 1 >= n {
                return sorted[n - 1];
            }
            let (a, b) = (sorted[j], sorted[j + 1]);
            // Interpolate from the nearer rank, as NumPy does.
            if g >= 0.5 {
                b - (b - a) * (1.0 - g)
            } else {
                a + (b - a) * g
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Outlier filter
// ---------------------------------------------------------------------------

impl FilterBounds {
    /// IQR bounds `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]` of a column.
    pub fn from_iqr(values: &[f64]) -> Self {
        let q1 = percentile(values, 25.0);
        let q3 = percentile(values, 75.0);
        let iqr = q3 - q1;
        FilterBounds {
            lower: q1 - IQR_WHISKER * iqr,
            upper: q3 + IQR_WHISKER * iqr,
        }
    }
}

/// Whether a sample with this angle survives filtering.
///
/// Angles outside `bounds` are outliers. An angle of exactly
/// [`NO_DETECTION`] is dropped even inside the bounds.
pub fn is_retained(angle: f64, bounds: &FilterBounds) -> bool {
    bounds.contains(angle) && angle != NO_DETECTION
}

/// Drop angle outliers and no-detection frames.
///
/// Bounds come from the full, unfiltered angle column. Frames, angles and
/// timestamps are filtered with one mask, so order and alignment hold.
/// An empty result is not an error.
pub fn filter_outliers(dataset: &Dataset) -> (Dataset, FilterBounds) {
    let bounds = FilterBounds::from_iqr(dataset.angles());
    log::debug!(
        "Angle bounds: [{:.4}, {:.4}]",
        bounds.lower,
        bounds.upper
    );

    let filtered: Dataset = dataset
        .iter()
        .filter(|sample| is_retained(sample.angle, &bounds))
        .collect();

    log::info!(
        "Retained {} of {} samples ({} dropped)",
        filtered.len(),
        dataset.len(),
        dataset.len() - filtered.len()
    );
    if filtered.is_empty() {
        log::warn!("No samples survived outlier filtering");
    }

    (filtered, bounds)
}
