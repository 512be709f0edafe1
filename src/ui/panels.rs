use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart::format_percent;
use crate::config::Config;
use crate::state::{AppState, Banner};

/// Actions the top bar asks the app to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    Reload,
    OpenFile,
}

// ---------------------------------------------------------------------------
// Left side panel – category selector
// ---------------------------------------------------------------------------

/// Render the category selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Categories");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.add(
        egui::TextEdit::singleline(&mut state.category_filter)
            .hint_text("Search…")
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
        if ui.small_button("Reset").clicked() {
            state.reset_selection();
        }
    });
    ui.label(format!("{} selected", state.selection.len()));
    ui.separator();

    // Owned copy so the checkboxes can mutate `state`.
    let categories: Vec<String> = state
        .visible_categories()
        .into_iter()
        .map(str::to_string)
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for category in &categories {
                let mut checked = state.selection.contains(category);
                let mut text = RichText::new(category);
                if checked {
                    text = text.color(state.color_map.color_for(category));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.set_selected(category, checked);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Right side panel – latest readings
// ---------------------------------------------------------------------------

/// Table of the most recent rate for each plotted category.
pub fn latest_readings(ui: &mut Ui, state: &AppState) {
    ui.heading("Latest");
    ui.separator();

    if state.chart.is_empty() {
        ui.label("Nothing selected.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .column(Column::remainder().at_least(120.0))
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Category");
            });
            header.col(|ui| {
                ui.strong("Month");
            });
            header.col(|ui| {
                ui.strong("Rate");
            });
        })
        .body(|mut body| {
            for series in &state.chart.series {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(
                            RichText::new(&series.category)
                                .color(state.color_map.color_for(&series.category)),
                        );
                    });
                    match series.latest() {
                        Some((month, rate)) => {
                            row.col(|ui| {
                                ui.label(month.to_string());
                            });
                            row.col(|ui| {
                                ui.monospace(format_percent(rate));
                            });
                        }
                        None => {
                            row.col(|ui| {
                                ui.weak("n/a");
                            });
                            row.col(|ui| {
                                ui.weak("–");
                            });
                        }
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> Option<TopBarAction> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(!state.loading, egui::Button::new("Reload from ONS"))
                .clicked()
            {
                action = Some(TopBarAction::Reload);
                ui.close_menu();
            }
            if ui.button("Open…").clicked() {
                action = Some(TopBarAction::OpenFile);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading…");
        } else if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} observations, {} categories",
                ds.len(),
                ds.categories.len()
            ));
            if let Some((first, last)) = ds.period_range() {
                ui.weak(format!("{first} to {last}"));
            }
        }

        match &state.banner {
            Some(Banner::Warning(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::from_rgb(200, 120, 0)));
            }
            Some(Banner::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
            }
            None => {}
        }
    });

    action
}

// ---------------------------------------------------------------------------
// Header and footer
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, state: &AppState) {
    ui.heading("UK Annual Inflation Rate (CPIH Index)");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Tick categories on the left to compare inflation in different sectors.");
        if let Some((first, last)) = state.chart.x_range() {
            ui.weak(format!("{first} – {last}"));
        }
    });
}

pub fn footer(ui: &mut Ui, state: &AppState, config: &Config) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Source:");
        ui.hyperlink_to("ONS API", &config.catalog_url);

        if let Some(release) = state.release() {
            let summary = release.summary();
            if !summary.is_empty() {
                ui.label(format!("({summary})"));
            }
        }
        if let Some(crate::fetch::DataSource::LocalFile(path)) = &state.source {
            ui.label(format!("(local file {path})"));
        }

        ui.separator();
        ui.label("Last update:");
        match state.loaded_at {
            Some(at) => ui.label(at.format("%d %b %Y").to_string()),
            None => ui.weak("never"),
        };
    });
}
