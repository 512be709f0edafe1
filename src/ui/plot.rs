use eframe::egui::Ui;
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoint, PlotPoints};

use crate::chart::format_percent;
use crate::data::model::YearMonth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Inflation plot (central panel)
// ---------------------------------------------------------------------------

/// Month label for an x grid mark; blank between whole months.
fn month_label(x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 {
        return String::new();
    }
    YearMonth::from_ordinal(rounded as i64).to_string()
}

/// Render the chart for the current selection.
pub fn inflation_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.heading("Fetching the latest CPIH release…");
            } else {
                ui.heading("No data loaded  (File → Reload or File → Open…)");
            }
        });
        return;
    }

    Plot::new("inflation_plot")
        .legend(Legend::default())
        .x_axis_label("Month")
        .y_axis_label("Annual rate")
        .x_axis_formatter(|mark: GridMark, _range| month_label(mark.value))
        .y_axis_formatter(|mark: GridMark, _range| format_percent(mark.value))
        .label_formatter(|name: &str, point: &PlotPoint| {
            let month = YearMonth::from_ordinal(point.x.round() as i64);
            if name.is_empty() {
                format!("{month}\n{}", format_percent(point.y))
            } else {
                format!("{name}\n{month}: {}", format_percent(point.y))
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.chart.series {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|&(month, rate)| [month.ordinal() as f64, rate])
                    .collect();

                let line = Line::new(points)
                    .name(&series.category)
                    .color(state.color_map.color_for(&series.category))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_whole_months() {
        let jan = YearMonth::new(2022, 1).unwrap().ordinal() as f64;
        assert_eq!(month_label(jan), "Jan 2022");
        assert_eq!(month_label(jan + 0.5), "");
    }
}
