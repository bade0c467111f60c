use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – statistics
// ---------------------------------------------------------------------------

/// Render the left panel: the text report and filter summary.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Statistics");
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(path) = &analysis.source {
                ui.label(RichText::new(path.display().to_string()).weak());
                ui.add_space(4.0);
            }

            ui.label(RichText::new(analysis.report().to_string()).monospace());
            if analysis.render.stats.is_none() {
                ui.label(
                    RichText::new("No samples survived filtering.").color(Color32::YELLOW),
                );
            }
            ui.separator();

            ui.strong("Outlier filter");
            egui::Grid::new("filter_summary")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.label("Lower bound");
                    ui.label(format!("{:.4}°", analysis.bounds.lower));
                    ui.end_row();
                    ui.label("Upper bound");
                    ui.label(format!("{:.4}°", analysis.bounds.upper));
                    ui.end_row();
                    ui.label("Retained");
                    ui.label(analysis.retained().to_string());
                    ui.end_row();
                    ui.label("Dropped");
                    ui.label(analysis.dropped().to_string());
                    ui.end_row();
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(analysis) = &state.analysis {
            ui.label(format!(
                "{} frames loaded, {} retained",
                analysis.total_samples,
                analysis.retained()
            ));
        }

        ui.separator();

        if ui.selectable_label(state.show_markers, "Markers").clicked() {
            state.show_markers = !state.show_markers;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open frame statistics")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
