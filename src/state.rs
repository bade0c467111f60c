use std::path::Path;

use crate::color::SeriesColors;
use crate::data::pipeline::Analysis;
use crate::data::stats::Histogram;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Current pipeline result (None until a file loads).
    pub analysis: Option<Analysis>,

    /// Delta-time histogram of `analysis`, cached.
    pub histogram: Option<Histogram>,

    /// Colours of the four plots.
    pub colors: SeriesColors,

    /// Draw point markers on the line plots.
    pub show_markers: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            analysis: None,
            histogram: None,
            colors: SeriesColors::default(),
            show_markers: true,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn with_analysis(analysis: Analysis) -> Self {
        let mut state = Self::default();
        state.set_analysis(analysis);
        state
    }

    /// Ingest a newly computed analysis and rebuild cached views.
    pub fn set_analysis(&mut self, analysis: Analysis) {
        self.histogram = Some(analysis.render.delta_histogram());
        self.analysis = Some(analysis);
        self.status_message = None;
    }

    /// Run the pipeline on `path`, keeping the previous analysis on failure.
    pub fn load(&mut self, path: &Path) {
        match Analysis::from_file(path) {
            Ok(analysis) => {
                log::info!(
                    "Analysed {}: {} of {} samples retained",
                    path.display(),
                    analysis.retained(),
                    analysis.total_samples
                );
                self.set_analysis(analysis);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
