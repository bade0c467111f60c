use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{PipelineError, Result};
use super::filter::filter_outliers;
use super::loader::load_file;
use super::model::{Dataset, DeltaSeries, FilterBounds, SummaryStats};
use super::stats::{compute_deltas, summarize, Histogram, HISTOGRAM_BINS};

// ---------------------------------------------------------------------------
// RenderRequest – what the plotting surface receives
// ---------------------------------------------------------------------------

/// Series handed to the plotting surface, all indexed by retained frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub frames: Vec<u64>,
    pub cleaned_angles: Vec<f64>,
    pub t_absolute: Vec<f64>,
    pub deltas: DeltaSeries,
    /// `None` when nothing survived filtering.
    pub stats: Option<SummaryStats>,
}

impl RenderRequest {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Histogram of the measured deltas (leading zero excluded).
    pub fn delta_histogram(&self) -> Histogram {
        Histogram::new(self.deltas.measured(), HISTOGRAM_BINS)
    }
}

/// Package the filtered columns, their deltas and the statistics.
pub fn present(
    filtered: Dataset,
    deltas: DeltaSeries,
    stats: Option<SummaryStats>,
) -> Result<RenderRequest> {
    if deltas.len() != filtered.len() {
        return Err(PipelineError::LengthMismatch {
            stage: "present",
            expected: filtered.len(),
            actual: deltas.len(),
        });
    }
    let (frames, cleaned_angles, t_absolute) = filtered.into_columns();
    Ok(RenderRequest {
        frames,
        cleaned_angles,
        t_absolute,
        deltas,
        stats,
    })
}

// ---------------------------------------------------------------------------
// Analysis – one full pipeline run
// ---------------------------------------------------------------------------

/// Result of running every stage over one input table.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub source: Option<PathBuf>,
    /// Samples in the input before filtering.
    pub total_samples: usize,
    pub bounds: FilterBounds,
    pub render: RenderRequest,
}

impl Analysis {
    /// Load `path` and run every stage over it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let dataset = load_file(path)?;
        let mut analysis = Self::run(&dataset)?;
        analysis.source = Some(path.to_path_buf());
        Ok(analysis)
    }

    /// Filter, compute deltas, summarize and package an in-memory dataset.
    ///
    /// An empty filter result does not fail: statistics become undefined.
    pub fn run(dataset: &Dataset) -> Result<Self> {
        let (filtered, bounds) = filter_outliers(dataset);
        let deltas = compute_deltas(&filtered);

        let stats = match summarize(&deltas, filtered.frames()) {
            Ok(stats) => Some(stats),
            Err(PipelineError::EmptyInput) => None,
            Err(e) => return Err(e),
        };

        Ok(Analysis {
            source: None,
            total_samples: dataset.len(),
            bounds,
            render: present(filtered, deltas, stats)?,
        })
    }

    pub fn retained(&self) -> usize {
        self.render.len()
    }

    pub fn dropped(&self) -> usize {
        self.total_samples - self.retained()
    }

    pub fn report(&self) -> Report<'_> {
        Report(self.render.stats.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Console report
// ---------------------------------------------------------------------------

/// Fixed-format text report of the frame processing times.
///
/// Undefined statistics print as `NaN`.
pub struct Report<'a>(pub Option<&'a SummaryStats>);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nan = f64::NAN;
        let (mean, median, stddev, min, max) = match self.0 {
            Some(s) => (s.mean, s.median, s.stddev, s.min, s.max),
            None => (nan, nan, nan, nan, nan),
        };
        let frame = self
            .0
            .map(|s| s.argmax_frame.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        writeln!(f, "=== Frame Processing Time Statistics ===")?;
        writeln!(f, "Mean:    {mean:.6} s")?;
        writeln!(f, "Median:  {median:.6} s")?;
        writeln!(f, "Stddev:  {stddev:.6} s")?;
        writeln!(f, "Min:     {min:.6} s")?;
        writeln!(f, "Max:     {max:.6} s at frame {frame}")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::loader::read_csv;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn end_to_end_without_outliers() {
        let ds = read_csv("frame,angle,t_absolute\n0,10,0.0\n1,12,0.1\n2,11,0.25\n3,13,0.4\n".as_bytes())
            .unwrap();
        let analysis = Analysis::run(&ds).unwrap();
        let render = &analysis.render;

        assert_eq!(analysis.retained(), 4);
        assert_eq!(analysis.dropped(), 0);
        assert_eq!(render.frames, vec![0, 1, 2, 3]);

        let expected = [0.0, 0.1, 0.15, 0.15];
        for (d, e) in render.deltas.values().iter().zip(expected) {
            assert_close(*d, e, 1e-12);
        }

        let stats = render.stats.unwrap();
        assert_close(stats.mean, 0.1, 1e-12);
        assert_close(stats.median, 0.125, 1e-12);
        assert_close(stats.stddev, 0.070_710_678, 1e-8);
        assert_eq!(stats.min, 0.0);
        assert_close(stats.max, 0.15, 1e-12);
        // 0.4 - 0.25 rounds one ulp above 0.25 - 0.1, so the last frame wins.
        assert_eq!(stats.argmax_frame, 3);
    }

    #[test]
    fn outliers_and_zeros_are_removed_before_deltas() {
        let ds = read_csv(
            "frame,angle,t_absolute\n\
             0,10,0.0\n1,0,0.5\n2,11,1.0\n3,900,1.5\n4,12,2.0\n5,11.5,3.0\n"
                .as_bytes(),
        )
        .unwrap();
        let analysis = Analysis::run(&ds).unwrap();
        let render = &analysis.render;

        assert_eq!(render.frames, vec![0, 2, 4, 5]);
        assert_eq!(render.cleaned_angles, vec![10.0, 11.0, 12.0, 11.5]);
        assert_eq!(render.deltas.values(), &[0.0, 1.0, 1.0, 1.0]);
        assert_eq!(analysis.dropped(), 2);
        assert_eq!(render.stats.unwrap().argmax_frame, 2);
    }

    #[test]
    fn render_series_are_aligned() {
        let ds = read_csv("f,a,t\n0,5,0\n1,6,1\n2,0,2\n3,7,4\n".as_bytes()).unwrap();
        let render = Analysis::run(&ds).unwrap().render;
        assert_eq!(render.frames.len(), render.cleaned_angles.len());
        assert_eq!(render.frames.len(), render.t_absolute.len());
        assert_eq!(render.frames.len(), render.deltas.len());
    }

    #[test]
    fn nothing_retained_leaves_stats_undefined() {
        let ds = read_csv("frame,angle,t_absolute\n0,0,0.0\n1,0,0.1\n".as_bytes()).unwrap();
        let analysis = Analysis::run(&ds).unwrap();

        assert!(analysis.render.is_empty());
        assert!(analysis.render.stats.is_none());

        let text = analysis.report().to_string();
        assert!(text.contains("Mean:    NaN s"), "{text}");
        assert!(text.contains("at frame n/a"), "{text}");
    }

    #[test]
    fn report_uses_six_decimals() {
        let stats = SummaryStats {
            mean: 0.1,
            median: 0.125,
            stddev: 0.0707106781,
            min: 0.0,
            max: 0.15,
            argmax_frame: 2,
        };
        let text = Report(Some(&stats)).to_string();
        assert_eq!(
            text,
            "=== Frame Processing Time Statistics ===\n\
             Mean:    0.100000 s\n\
             Median:  0.125000 s\n\
             Stddev:  0.070711 s\n\
             Min:     0.000000 s\n\
             Max:     0.150000 s at frame 2\n"
        );
    }

    #[test]
    fn histogram_skips_leading_zero() {
        let ds = read_csv("f,a,t\n0,5,0\n1,6,1\n2,5.5,3\n".as_bytes()).unwrap();
        let hist = Analysis::run(&ds).unwrap().render.delta_histogram();
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
        assert_eq!(hist.edges[0], 1.0);
        assert_eq!(hist.edges[10], 2.0);
    }

    #[test]
    fn present_rejects_misaligned_deltas() {
        let ds = read_csv("f,a,t\n0,5,0\n1,6,1\n".as_bytes()).unwrap();
        let err = present(ds, DeltaSeries::from(vec![0.0]), None).unwrap_err();
        assert!(matches!(err, PipelineError::LengthMismatch { stage: "present", .. }));
    }

    #[test]
    fn from_file_records_source() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "frame,angle,t_absolute\n0,1.0,0.0\n1,1.2,0.033\n").unwrap();

        let analysis = Analysis::from_file(file.path()).unwrap();
        assert_eq!(analysis.source.as_deref(), Some(file.path()));
        assert_eq!(analysis.total_samples, 2);
    }
}
