//! Route browser screen: filter panel, marker map and sortable route table.

use egui::{Color32, RichText, ScrollArea, Ui};

use crate::api::RouteSummary;
use crate::browser::filter::{DIFFICULTY_SLIDER, DISTANCE_SLIDER, ELEVATION_SLIDER};
use crate::browser::{
    BrowserMessage, FilterPatch, LoadState, MapBounds, RangeFilter, RouteBrowser, RouteTrace,
    SortColumn,
};
use crate::ui::theme::status_colors;
use crate::ui::widgets::route_map::empty_map_hint;
use crate::ui::widgets::{MapMarker, RouteMap};

/// Action from the route browser.
#[derive(Debug, Clone)]
pub enum RouteBrowserAction {
    /// Apply a state change
    Message(BrowserMessage),
    /// Fetch the listing again
    Reload,
    /// Open the comparison for the current selection
    Compare,
    /// Map viewport this frame (not yet debounced)
    Viewport(MapBounds),
    /// Map marker clicked
    MarkerClicked(String),
    /// Show reviews for a route
    OpenReviews { route_id: String, name: String },
}

/// Route browser screen state.
#[derive(Default)]
pub struct RouteBrowserScreen;

impl RouteBrowserScreen {
    pub fn new() -> Self {
        Self
    }

    /// Show the screen. Filter widgets mirror `browser`'s state every frame, so
    /// a reload that resets filters is reflected immediately.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        browser: &RouteBrowser,
        trace: &RouteTrace,
    ) -> Vec<RouteBrowserAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Routes");
            ui.separator();
            self.render_status(ui, browser);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let loading = *browser.load_state() == LoadState::Loading;
                if ui
                    .add_enabled(!loading, egui::Button::new("⟳ Refresh"))
                    .clicked()
                {
                    actions.push(RouteBrowserAction::Reload);
                }
            });
        });
        ui.separator();

        egui::SidePanel::left("route_filters")
            .resizable(false)
            .default_width(230.0)
            .show_inside(ui, |ui| {
                self.render_filters(ui, browser, &mut actions);
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            self.render_map(ui, browser, trace, &mut actions);
            ui.add_space(8.0);
            self.render_selection_bar(ui, browser, &mut actions);
            ui.add_space(4.0);
            self.render_table(ui, browser, &mut actions);
        });

        actions
    }

    fn render_status(&self, ui: &mut Ui, browser: &RouteBrowser) {
        match browser.load_state() {
            LoadState::Idle => {
                ui.label(RichText::new("Not loaded").weak());
            }
            LoadState::Loading => {
                ui.spinner();
                ui.label("Loading routes...");
            }
            LoadState::Loaded => {
                ui.label(format!(
                    "Showing {} of {} routes",
                    browser.visible_count(),
                    browser.all_routes().len()
                ));
            }
            LoadState::LoadFailed(message) => {
                ui.colored_label(
                    status_colors::ERROR,
                    format!("Error loading routes: {}", message),
                );
            }
        }
    }

    fn render_filters(
        &self,
        ui: &mut Ui,
        browser: &RouteBrowser,
        actions: &mut Vec<RouteBrowserAction>,
    ) {
        let filter = browser.filter();
        let enabled = *browser.load_state() == LoadState::Loaded;
        let mut patch = FilterPatch::default();

        ui.add_enabled_ui(enabled, |ui| {
            ui.heading("Filters");
            ui.add_space(4.0);

            ui.label("Route name");
            let mut name = filter.name.clone();
            if ui.text_edit_singleline(&mut name).changed() {
                patch.name = Some(name);
            }

            ui.label("Start location");
            let mut location = filter.location.clone();
            if ui.text_edit_singleline(&mut location).changed() {
                patch.location = Some(location);
            }

            ui.label("Tag");
            let mut tag = filter.tag.clone();
            if ui.text_edit_singleline(&mut tag).changed() {
                patch.tag = Some(tag);
            }

            ui.add_space(4.0);
            ui.label("Surface");
            let current = if filter.surface.is_empty() {
                "Any".to_string()
            } else {
                filter.surface.clone()
            };
            egui::ComboBox::from_id_salt("surface_filter")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(filter.surface.is_empty(), "Any")
                        .clicked()
                    {
                        patch.surface = Some(String::new());
                    }
                    for surface in browser.surface_types() {
                        if ui
                            .selectable_label(filter.surface == surface, surface.as_str())
                            .clicked()
                        {
                            patch.surface = Some(surface);
                        }
                    }
                });

            ui.add_space(8.0);
            patch.difficulty =
                range_sliders(ui, "Difficulty", "", filter.difficulty, DIFFICULTY_SLIDER);
            patch.distance_km =
                range_sliders(ui, "Distance", " km", filter.distance_km, DISTANCE_SLIDER);
            patch.elevation_m =
                range_sliders(ui, "Ascent", " m", filter.elevation_m, ELEVATION_SLIDER);

            ui.add_space(8.0);
            let mut within_map = filter.within_map;
            if ui
                .checkbox(&mut within_map, "Only routes in map view")
                .changed()
            {
                patch.within_map = Some(within_map);
            }

            ui.add_space(8.0);
            if ui.button("Reset filters").clicked() {
                actions.push(RouteBrowserAction::Message(BrowserMessage::ResetFilters));
            }
        });

        if patch != FilterPatch::default() {
            actions.push(RouteBrowserAction::Message(BrowserMessage::SetFilter(patch)));
        }
    }

    fn render_map(
        &self,
        ui: &mut Ui,
        browser: &RouteBrowser,
        trace: &RouteTrace,
        actions: &mut Vec<RouteBrowserAction>,
    ) {
        let markers: Vec<MapMarker<'_>> = browser
            .visible()
            .filter_map(|r| {
                r.start_point().map(|(lat, lon)| MapMarker {
                    id: &r.id,
                    name: r.display_name(),
                    lat,
                    lon,
                })
            })
            .collect();

        if markers.is_empty() && *browser.load_state() == LoadState::Loaded {
            empty_map_hint(ui);
        }

        let response = RouteMap::new(markers)
            .trace(trace.points())
            .selected(trace.selected())
            .show(ui);

        actions.push(RouteBrowserAction::Viewport(response.bounds));
        if let Some(id) = response.clicked {
            actions.push(RouteBrowserAction::MarkerClicked(id));
        }
    }

    fn render_selection_bar(
        &self,
        ui: &mut Ui,
        browser: &RouteBrowser,
        actions: &mut Vec<RouteBrowserAction>,
    ) {
        let selection = browser.selection();
        ui.horizontal(|ui| {
            let compare = egui::Button::new(format!("Compare ({})", selection.len()));
            if ui
                .add_enabled(selection.can_compare(), compare)
                .on_disabled_hover_text("Select at least two routes")
                .clicked()
            {
                actions.push(RouteBrowserAction::Compare);
            }
            if ui.button("Select all shown").clicked() {
                actions.push(RouteBrowserAction::Message(BrowserMessage::SelectAllVisible));
            }
            if ui
                .add_enabled(!selection.is_empty(), egui::Button::new("Clear selection"))
                .clicked()
            {
                actions.push(RouteBrowserAction::Message(BrowserMessage::ClearSelection));
            }
        });
    }

    fn render_table(
        &self,
        ui: &mut Ui,
        browser: &RouteBrowser,
        actions: &mut Vec<RouteBrowserAction>,
    ) {
        if browser.visible_count() == 0 {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                let text = if browser.all_routes().is_empty() {
                    "No routes available"
                } else {
                    "No routes match your filters"
                };
                ui.label(RichText::new(text).weak());
            });
            return;
        }

        let sort = browser.sort();
        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("route_table")
                .striped(true)
                .num_columns(SortColumn::ALL.len() + 2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("");
                    for column in SortColumn::ALL {
                        let header = format!("{}{}", column.label(), sort.indicator(column));
                        if ui
                            .add(egui::Button::new(RichText::new(header).strong()).frame(false))
                            .clicked()
                        {
                            actions.push(RouteBrowserAction::Message(BrowserMessage::SetSort(
                                column,
                            )));
                        }
                    }
                    ui.label("");
                    ui.end_row();

                    for route in browser.visible() {
                        let mut checked = browser.selection().contains(&route.id);
                        if ui.checkbox(&mut checked, "").changed() {
                            actions.push(RouteBrowserAction::Message(
                                BrowserMessage::ToggleSelection(route.id.clone()),
                            ));
                        }
                        render_row(ui, route, selection_color(route, browser));
                        if ui.small_button("Reviews").clicked() {
                            actions.push(RouteBrowserAction::OpenReviews {
                                route_id: route.id.clone(),
                                name: route.display_name().to_string(),
                            });
                        }
                        ui.end_row();
                    }
                });
        });
    }
}

/// Two sliders for a range filter. Returns a new range when either moved.
fn range_sliders(
    ui: &mut Ui,
    label: &str,
    suffix: &str,
    range: RangeFilter,
    extent: (f64, f64),
) -> Option<RangeFilter> {
    let (mut low, mut high) = range.slider_values(extent);
    ui.label(label);
    let low_changed = ui
        .add(egui::Slider::new(&mut low, extent.0..=extent.1).text("min").suffix(suffix))
        .changed();
    let high_changed = ui
        .add(egui::Slider::new(&mut high, extent.0..=extent.1).text("max").suffix(suffix))
        .changed();

    if !(low_changed || high_changed) {
        return None;
    }
    // Keep the handles ordered
    if low > high {
        if low_changed {
            high = low;
        } else {
            low = high;
        }
    }
    Some(RangeFilter::from_slider(low, high, extent))
}

fn render_row(ui: &mut Ui, route: &RouteSummary, name_color: Option<Color32>) {
    let name = RichText::new(route.display_name());
    ui.label(match name_color {
        Some(color) => name.color(color).strong(),
        None => name,
    });
    ui.label(route.start_location_name.as_deref().unwrap_or("-"));
    ui.label(format_number(route.metrics.distance_km, 1));
    ui.label(format_number(route.metrics.elevation_gain_m, 0));
    ui.label(format_number(route.difficulty_score, 1));
    ui.label(
        route
            .published()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    ui.label(route.creator_username.as_deref().unwrap_or("-"));
}

/// Highlight colour for a route that is part of the selection.
fn selection_color(route: &RouteSummary, browser: &RouteBrowser) -> Option<Color32> {
    browser
        .selection()
        .contains(&route.id)
        .then_some(crate::ui::theme::TRACE_COLOR)
}

fn format_number(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}
