//! Comparison window: metric table, radar, elevation overlay and top reviews.

use egui::{RichText, ScrollArea, Ui, Vec2};

use super::elevation_chart::ElevationChart;
use super::radar_chart::RadarChart;
use super::review_card::ReviewCard;
use crate::browser::{ComparisonState, ComparisonView};
use crate::ui::theme::{chart_color, status_colors};

/// Show the comparison window for `state`. Returns true when the user closes it.
pub fn show_comparison(ctx: &egui::Context, state: &ComparisonState) -> bool {
    if *state == ComparisonState::Closed {
        return false;
    }

    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new("Route Comparison")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size(Vec2::new(900.0, 700.0))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| match state {
            ComparisonState::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.spinner();
                    ui.label("Loading comparison...");
                });
            }
            ComparisonState::Failed(message) => {
                ui.colored_label(
                    status_colors::ERROR,
                    format!("Error loading comparison data: {}", message),
                );
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            }
            ComparisonState::Ready { view, generation } => {
                ScrollArea::vertical().show(ui, |ui| {
                    show_view(ui, view, *generation);
                });
            }
            ComparisonState::Closed => {}
        });

    !open || close_clicked
}

fn show_view(ui: &mut Ui, view: &ComparisonView, generation: u64) {
    ui.heading("Key Metrics");
    egui::Grid::new(("comparison_metrics", generation))
        .striped(true)
        .num_columns(view.routes.len() + 1)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Metric").strong());
            for (i, route) in view.routes.iter().enumerate() {
                ui.label(
                    RichText::new(route.summary.display_name())
                        .strong()
                        .color(chart_color(i)),
                );
            }
            ui.end_row();

            for row in &view.metric_rows {
                ui.label(row.label);
                for cell in &row.cells {
                    ui.label(cell.as_str());
                }
                ui.end_row();
            }
        });

    ui.add_space(12.0);
    ui.heading("Profile");
    RadarChart::new(&view.radar, generation).show(ui);

    ui.add_space(12.0);
    ui.heading("Elevation");
    ElevationChart::new(&view.elevation, generation).show(ui);

    ui.add_space(12.0);
    ui.heading("Top Reviews");
    ui.columns(view.routes.len().max(1), |columns| {
        for (column, route) in columns.iter_mut().zip(&view.routes) {
            column.label(RichText::new(route.summary.display_name()).strong());
            match &route.top_review {
                Some(review) => {
                    ReviewCard::new(review).truncate(true).show(column);
                }
                None => {
                    column.label(RichText::new("No reviews yet.").weak());
                }
            }
        }
    });
}
