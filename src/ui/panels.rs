use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::CountrySelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let bounds = dataset.year_bounds();
    let countries = dataset.countries.clone();

    // ---- Release year range ----
    if let Some((lo, hi)) = bounds {
        ui.strong("Release year");
        let (mut from, mut to) = state.criteria.year_range;
        let from_changed = ui
            .add(egui::Slider::new(&mut from, lo..=hi).text("from"))
            .changed();
        let to_changed = ui
            .add(egui::Slider::new(&mut to, lo..=hi).text("to"))
            .changed();
        if from_changed || to_changed {
            // Dragging one handle past the other pushes it along.
            if from > to {
                if from_changed {
                    to = from;
                } else {
                    from = to;
                }
            }
            state.set_year_range(from, to);
        }
        ui.separator();
    }

    // ---- Country ----
    ui.strong("Country");
    let current = state.criteria.country.clone();
    let mut picked = None;
    egui::ComboBox::from_id_salt("country")
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current == CountrySelection::All, "All")
                .clicked()
            {
                picked = Some(CountrySelection::All);
            }
            for country in &countries {
                let selected = matches!(&current, CountrySelection::Exact(c) if c == country);
                if ui.selectable_label(selected, country).clicked() {
                    picked = Some(CountrySelection::Exact(country.clone()));
                }
            }
        });
    if let Some(country) = picked {
        state.set_country(country);
    }
    ui.label(
        RichText::new("Matches the whole country field; co-productions are listed separately.")
            .small()
            .weak(),
    );

    ui.separator();

    // ---- Keyword search ----
    ui.strong("Keyword search");
    let mut term = state.criteria.search_term.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut term).hint_text("Title or description"),
    );
    if response.changed() {
        state.set_search_term(&term);
    }

    ui.separator();
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Reset filters").clicked() {
            state.reset_filters();
        }
        if ui.button("Show all titles").clicked() {
            state.show_everything();
        }
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
            if ui.button("Reload").clicked() {
                if let Some(path) = state.source.clone() {
                    state.load_path(&path);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset() {
            let visible = state.outcome.dashboard().map_or(0, |d| d.rows.len());
            ui.label(format!("{} titles loaded, {} visible", ds.len(), visible));
        }

        if let Some(path) = &state.source {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let crate::data::pipeline::PipelineOutcome::LoadFailed(msg) = &state.outcome {
            ui.separator();
            ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open title catalogue")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
