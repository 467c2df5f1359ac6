//! Overlaid elevation profiles with a distance/elevation/gradient readout.

use egui::{Response, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::browser::compare::{series_label, ElevationSeries};
use crate::ui::theme::chart_color;

pub struct ElevationChart<'a> {
    series: &'a [ElevationSeries],
    generation: u64,
    height: f32,
}

impl<'a> ElevationChart<'a> {
    pub fn new(series: &'a [ElevationSeries], generation: u64) -> Self {
        Self {
            series,
            generation,
            height: 260.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        if self.series.iter().all(|s| s.samples.is_empty()) {
            return ui.label("No elevation data available for these routes.");
        }

        let series = self.series;
        let labels: Vec<String> = series
            .iter()
            .enumerate()
            .map(|(i, s)| series_label(i, &s.name))
            .collect();
        let hover_labels = labels.clone();

        Plot::new(("comparison_elevation", self.generation))
            .height(self.height)
            .allow_drag(true)
            .allow_zoom(true)
            .allow_scroll(false)
            .x_axis_label("Distance (km)")
            .y_axis_label("Elevation (m)")
            .legend(Legend::default())
            .label_formatter(move |name, value| {
                let sample =
                    series_for_label(series, &hover_labels, name).and_then(|s| s.nearest(value.x));
                match sample {
                    Some(s) => format!(
                        "{}\nDistance: {:.2} km\nElevation: {:.0} m\nGradient: {:.1}%",
                        name, s.dist_km, s.ele_m, s.gradient_pct
                    ),
                    None => format!("{:.2} km, {:.0} m", value.x, value.y),
                }
            })
            .show(ui, |plot_ui| {
                for (i, (s, label)) in series.iter().zip(&labels).enumerate() {
                    let points: PlotPoints = s.samples.iter().map(|p| [p.dist_km, p.ele_m]).collect();
                    plot_ui.line(
                        Line::new(label.as_str(), points)
                            .color(chart_color(i))
                            .width(2.0),
                    );
                }
            })
            .response
    }
}

/// Find the series drawn under `label`. Labels are numbered, so routes sharing
/// a display name still resolve to their own series.
fn series_for_label<'a>(
    series: &'a [ElevationSeries],
    labels: &[String],
    label: &str,
) -> Option<&'a ElevationSeries> {
    labels
        .iter()
        .position(|l| l == label)
        .and_then(|i| series.get(i))
}
