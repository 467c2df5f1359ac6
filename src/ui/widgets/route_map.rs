//! Route start-marker map.
//!
//! Longitude on x, latitude on y. There is no tile layer; the plot grid gives
//! orientation and the viewport rectangle drives the "filter by map" predicate.

use egui::{Color32, Pos2, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::browser::MapBounds;
use crate::ui::theme::{MARKER_COLOR, TRACE_COLOR};

/// Initial viewport, roughly the UK.
const INITIAL_VIEW: MapBounds = MapBounds {
    south: 49.9,
    west: -8.2,
    north: 58.7,
    east: 1.8,
};

/// Marker hit radius in screen pixels.
const CLICK_RADIUS: f32 = 10.0;

/// A start marker.
#[derive(Debug, Clone, Copy)]
pub struct MapMarker<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub lat: f64,
    pub lon: f64,
}

/// What happened on the map this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MapResponse {
    /// Current viewport
    pub bounds: MapBounds,
    /// Marker clicked this frame
    pub clicked: Option<String>,
}

/// Marker map widget.
pub struct RouteMap<'a> {
    markers: Vec<MapMarker<'a>>,
    trace: &'a [(f64, f64)],
    selected: Option<&'a str>,
    height: f32,
}

impl<'a> RouteMap<'a> {
    pub fn new(markers: Vec<MapMarker<'a>>) -> Self {
        Self {
            markers,
            trace: &[],
            selected: None,
            height: 320.0,
        }
    }

    /// Track to draw as `(lat, lon)`.
    pub fn trace(mut self, trace: &'a [(f64, f64)]) -> Self {
        self.trace = trace;
        self
    }

    /// Highlight a marker.
    pub fn selected(mut self, id: Option<&'a str>) -> Self {
        self.selected = id;
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut Ui) -> MapResponse {
        // Degrees of longitude shrink with latitude; stretch to keep shapes sane
        let aspect = 1.0 / 53.0_f64.to_radians().cos();

        let plot = Plot::new("route_map")
            .height(self.height)
            .data_aspect(aspect as f32)
            .allow_drag(true)
            .allow_zoom(true)
            .allow_scroll(true)
            .allow_double_click_reset(false)
            .include_x(INITIAL_VIEW.west)
            .include_x(INITIAL_VIEW.east)
            .include_y(INITIAL_VIEW.south)
            .include_y(INITIAL_VIEW.north)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("{:.4}, {:.4}", value.y, value.x)
                } else {
                    name.to_string()
                }
            });

        let response = plot.show(ui, |plot_ui| {
            if self.trace.len() > 1 {
                let points: PlotPoints = self
                    .trace
                    .iter()
                    .map(|&(lat, lon)| [lon, lat])
                    .collect();
                plot_ui.line(Line::new("", points).color(TRACE_COLOR).width(3.0));
            }

            for marker in &self.markers {
                let is_selected = self.selected == Some(marker.id);
                let (color, radius) = if is_selected {
                    (TRACE_COLOR, 7.0)
                } else {
                    (MARKER_COLOR, 5.0)
                };
                plot_ui.points(
                    Points::new(marker.name, vec![[marker.lon, marker.lat]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(color),
                );
            }
        });

        let plot_bounds = response.transform.bounds();
        let (min, max) = (plot_bounds.min(), plot_bounds.max());
        let bounds = MapBounds::new(min[1], min[0], max[1], max[0]);

        let clicked = if response.response.clicked() {
            response
                .response
                .interact_pointer_pos()
                .and_then(|pos| self.marker_at(pos, |p| response.transform.position_from_point(&p)))
        } else {
            None
        };

        MapResponse { bounds, clicked }
    }

    /// Nearest marker within the click radius of a screen position.
    fn marker_at(&self, pos: Pos2, to_screen: impl Fn(PlotPoint) -> Pos2) -> Option<String> {
        self.markers
            .iter()
            .map(|m| (m, to_screen(PlotPoint::new(m.lon, m.lat)).distance(pos)))
            .filter(|(_, d)| *d <= CLICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m.id.to_string())
    }
}

/// Placeholder overlay shown while the listing is empty.
pub fn empty_map_hint(ui: &mut Ui) {
    ui.colored_label(Color32::GRAY, "No routes with start coordinates to show.");
}
