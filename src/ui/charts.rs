use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Mesh, Pos2, RichText, Sense, Shape, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::{generate_palette, reds_for_counts};
use crate::data::aggregate::Ranking;
use crate::data::model::TitleDataset;
use crate::data::pipeline::{Dashboard, PipelineOutcome};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render whatever the last pipeline run produced.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    match &state.outcome {
        PipelineOutcome::NotLoaded => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a title catalogue to start  (File → Open…)");
            });
        }
        PipelineOutcome::LoadFailed(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("Could not load the dataset:\n{msg}"))
                        .color(Color32::RED)
                        .heading(),
                );
            });
        }
        PipelineOutcome::Failed(e) => {
            ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
        }
        PipelineOutcome::Empty(d) => {
            heading(ui, d);
            ui.add_space(8.0);
            ui.label(
                RichText::new("No titles match the current filters. Widen the year range, pick another country or clear the search.")
                    .color(Color32::from_rgb(230, 160, 30))
                    .strong(),
            );
        }
        PipelineOutcome::Ready(d) => {
            let Some(dataset) = state.dataset() else {
                log::error!("Dashboard is ready but no dataset is loaded");
                ui.label(
                    RichText::new("Internal error: no dataset behind the dashboard.")
                        .color(Color32::RED),
                );
                return;
            };
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ready(ui, dataset, d, state.config.preview_rows);
                });
        }
    }
}

fn heading(ui: &mut Ui, d: &Dashboard) {
    if let Some(h) = d.country_heading() {
        ui.heading(h);
    }
}

fn ready(ui: &mut Ui, dataset: &TitleDataset, d: &Dashboard, preview_rows: usize) {
    heading(ui, d);

    // ---- Metrics ----
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Titles", d.metrics.total);
        metric(&mut cols[1], "Movies", d.metrics.movies);
        metric(&mut cols[2], "TV shows", d.metrics.tv_shows);
    });
    ui.separator();
    ui.label(RichText::new(d.metrics.summary()).italics());
    ui.add_space(8.0);

    // ---- Row 1: preview + year trend ----
    ui.columns(2, |cols| {
        cols[0].strong(format!("Data preview (first {preview_rows})"));
        preview_table(&mut cols[0], dataset, d.preview(preview_rows));

        cols[1].strong(format!("Titles per release year ({})", d.criteria.country));
        year_trend_plot(&mut cols[1], &d.year_trend);
    });
    ui.add_space(8.0);

    // ---- Row 2: countries + genres ----
    ui.columns(2, |cols| {
        cols[0].strong("Top 10 countries by titles");
        top_countries_chart(&mut cols[0], &d.top_countries);

        cols[1].strong("Genre distribution (top 8)");
        genre_donut(&mut cols[1], &d.genres);
    });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value.to_string()).size(28.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Preview table
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, dataset: &TitleDataset, rows: &[usize]) {
    let core = ["type", "title", "country", "release_year", "listed_in"];

    egui::ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .resizable(true)
                .columns(Column::auto().at_least(60.0).clip(true), core.len())
                .columns(Column::auto().at_least(60.0).clip(true), dataset.extra_columns.len())
                .header(20.0, |mut header| {
                    for name in core.iter().copied().chain(dataset.extra_columns.iter().map(String::as_str)) {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for r in dataset.rows(rows) {
                        body.row(18.0, |mut row| {
                            let cells = [
                                Some(r.kind.to_string()),
                                r.title.clone(),
                                r.country.clone(),
                                Some(r.release_year.to_string()),
                                r.listed_in.clone(),
                            ];
                            let extras = dataset.extra_columns.iter().map(|c| r.extra.get(c).cloned());
                            for cell in cells.into_iter().chain(extras) {
                                row.col(|ui: &mut Ui| {
                                    ui.add(egui::Label::new(cell.unwrap_or_default()).truncate());
                                });
                            }
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Year trend
// ---------------------------------------------------------------------------

fn year_trend_plot(ui: &mut Ui, trend: &[(i32, usize)]) {
    let points: PlotPoints = trend
        .iter()
        .map(|&(year, n)| [year as f64, n as f64])
        .collect();

    Plot::new("year_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("Release year")
        .y_axis_label("Titles")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("titles")
                    .color(Color32::from_rgb(229, 9, 20))
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Top countries
// ---------------------------------------------------------------------------

fn top_countries_chart(ui: &mut Ui, ranking: &Ranking) {
    let counts: Vec<usize> = ranking.iter().map(|(_, n)| *n).collect();
    let colors = reds_for_counts(&counts);

    let bars: Vec<Bar> = ranking
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((country, n), color))| {
            Bar::new(i as f64, *n as f64)
                .name(country)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = ranking.iter().map(|(c, _)| short_label(c)).collect();

    Plot::new("top_countries")
        .height(CHART_HEIGHT)
        .y_axis_label("Titles")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis labels for long co-production strings.
fn short_label(country: &str) -> String {
    const MAX: usize = 14;
    if country.chars().count() <= MAX {
        country.to_string()
    } else {
        let head: String = country.chars().take(MAX - 1).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Genre donut
// ---------------------------------------------------------------------------

fn genre_donut(ui: &mut Ui, genres: &Ranking) {
    let total: usize = genres.iter().map(|(_, n)| n).sum();
    if total == 0 {
        ui.label("No genre information for these titles.");
        return;
    }
    let colors = generate_palette(genres.len());

    ui.horizontal(|ui: &mut Ui| {
        let side = CHART_HEIGHT.min(ui.available_width() * 0.5);
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
        let outer = side * 0.48;
        let inner = outer * 0.3;

        let mut start = -TAU / 4.0;
        for ((_, n), color) in genres.iter().zip(&colors) {
            let sweep = TAU * (*n as f32 / total as f32);
            ui.painter()
                .add(ring_segment(rect.center(), inner, outer, start, start + sweep, *color));
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for ((genre, n), color) in genres.iter().zip(&colors) {
                let share = 100.0 * *n as f32 / total as f32;
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, *color);
                    ui.label(format!("{genre}  {n} ({share:.1}%)"));
                });
            }
        });
    });
}

/// Filled annulus slice between angles `a0` and `a1` (radians).
fn ring_segment(center: Pos2, inner: f32, outer: f32, a0: f32, a1: f32, color: Color32) -> Shape {
    let steps = (((a1 - a0) / 0.05).ceil() as usize).max(2);
    let mut mesh = Mesh::default();
    for k in 0..=steps {
        let a = a0 + (a1 - a0) * k as f32 / steps as f32;
        let dir = Vec2::angled(a);
        mesh.colored_vertex(center + dir * inner, color);
        mesh.colored_vertex(center + dir * outer, color);
    }
    for k in 0..steps as u32 {
        let i = 2 * k;
        mesh.add_triangle(i, i + 1, i + 3);
        mesh.add_triangle(i, i + 3, i + 2);
    }
    Shape::mesh(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::model::fixtures::catalogue;
    use crate::data::pipeline::LoadState;

    fn rendered_text(state: &AppState) -> Vec<String> {
        fn collect(shape: &Shape, out: &mut Vec<String>) {
            match shape {
                Shape::Text(text) => out.push(text.galley.text().to_string()),
                Shape::Vec(shapes) => shapes.iter().for_each(|s| collect(s, out)),
                _ => {}
            }
        }

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui: &mut Ui| dashboard(ui, state));
        });
        let mut out = Vec::new();
        for clipped in &output.shapes {
            collect(&clipped.shape, &mut out);
        }
        out
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("India"), "India");
        assert_eq!(short_label("United States, India"), "United States…");
    }

    #[test]
    fn test_ring_segment_mesh() {
        let Shape::Mesh(mesh) = ring_segment(Pos2::ZERO, 10.0, 20.0, 0.0, TAU / 2.0, Color32::RED) else {
            panic!("expected a mesh");
        };
        let steps = (mesh.vertices.len() / 2) - 1;
        assert!(steps >= 2);
        assert_eq!(mesh.indices.len(), steps * 6);
        assert!(mesh.vertices.iter().all(|v| {
            let r = v.pos.to_vec2().length();
            (9.99..=20.01).contains(&r)
        }));
    }

    #[test]
    fn test_ready_without_dataset_shows_error() {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(catalogue());
        assert!(matches!(state.outcome, PipelineOutcome::Ready(_)));

        state.load = LoadState::NotLoaded;
        let text = rendered_text(&state);
        assert!(
            text.iter().any(|t| t.contains("no dataset behind the dashboard")),
            "{text:?}"
        );
    }

    #[test]
    fn test_load_failure_is_rendered() {
        let mut state = AppState::new(AppConfig::default());
        state.load = LoadState::Failed("opening CSV".into());
        state.refresh();
        let text = rendered_text(&state);
        assert!(text.iter().any(|t| t.contains("Could not load the dataset")), "{text:?}");
    }
}
