//! Normalised metric radar chart for the comparison view.

use std::f64::consts::{FRAC_PI_2, TAU};

use egui::{Align2, Response, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::browser::compare::{series_label, RadarSeries, RADAR_AXES};
use crate::ui::theme::chart_color;

/// Grid rings, as percentages of the reference maximum.
const RINGS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

/// Radar chart over `RADAR_AXES`.
pub struct RadarChart<'a> {
    series: &'a [RadarSeries],
    /// Salts the plot id so a new comparison gets fresh plot memory
    generation: u64,
    height: f32,
}

impl<'a> RadarChart<'a> {
    pub fn new(series: &'a [RadarSeries], generation: u64) -> Self {
        Self {
            series,
            generation,
            height: 320.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let grid_color = ui.visuals().weak_text_color().linear_multiply(0.5);
        let label_color = ui.visuals().text_color();

        Plot::new(("comparison_radar", self.generation))
            .height(self.height)
            .data_aspect(1.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_axes(false)
            .show_grid(false)
            .include_x(-1.35)
            .include_x(1.35)
            .include_y(-1.2)
            .include_y(1.25)
            .legend(egui_plot::Legend::default())
            .label_formatter(|name, _| name.to_string())
            .show(ui, |plot_ui| {
                for ring in RINGS {
                    let points: PlotPoints = (0..=RADAR_AXES.len())
                        .map(|i| spoke_point(i % RADAR_AXES.len(), ring))
                        .collect();
                    plot_ui.line(Line::new("", points).color(grid_color).width(1.0));
                }

                for (i, axis) in RADAR_AXES.iter().enumerate() {
                    let [x, y] = spoke_point(i, 100.0);
                    plot_ui.line(
                        Line::new("", vec![[0.0, 0.0], [x, y]])
                            .color(grid_color)
                            .width(1.0),
                    );

                    let [lx, ly] = spoke_point(i, 115.0);
                    plot_ui.text(
                        Text::new("", PlotPoint::new(lx, ly), axis.label)
                            .color(label_color)
                            .anchor(Align2::CENTER_CENTER),
                    );
                }

                for (i, series) in self.series.iter().enumerate() {
                    let color = chart_color(i);
                    let points: Vec<[f64; 2]> = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(axis, &value)| spoke_point(axis, value))
                        .collect();
                    plot_ui.polygon(
                        Polygon::new(series_label(i, &series.name), PlotPoints::new(points))
                            .fill_color(color.linear_multiply(0.2))
                            .stroke(Stroke::new(2.0, color)),
                    );
                }
            })
            .response
    }
}

/// Plot position for `value` (0..=100) on spoke `axis`; the first spoke points up.
fn spoke_point(axis: usize, value: f64) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * axis as f64 / RADAR_AXES.len() as f64;
    let r = value / 100.0;
    [r * angle.cos(), r * angle.sin()]
}
