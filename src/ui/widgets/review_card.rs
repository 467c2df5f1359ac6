//! Review card with star ratings and optional vote buttons.

use egui::{RichText, Ui};

use crate::api::{Review, VoteDirection};
use crate::browser::compare::truncate_report;

/// Star string for a 1-5 rating, or "Not rated".
pub fn star_rating(rating: Option<u8>) -> String {
    match rating {
        Some(r) => {
            let filled = r.clamp(1, 5) as usize;
            format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
        }
        None => "Not rated".to_string(),
    }
}

pub struct ReviewCard<'a> {
    review: &'a Review,
    /// Cut the report to a preview
    truncate: bool,
    /// Show up/down vote buttons
    votable: bool,
    /// Vote error to show under the card
    error: Option<&'a str>,
}

impl<'a> ReviewCard<'a> {
    pub fn new(review: &'a Review) -> Self {
        Self {
            review,
            truncate: false,
            votable: false,
            error: None,
        }
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn votable(mut self, votable: bool) -> Self {
        self.votable = votable;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Draw the card. Returns a vote direction when a vote button was clicked.
    pub fn show(self, ui: &mut Ui) -> Option<VoteDirection> {
        let mut vote = None;
        let review = self.review;

        egui::Frame::new()
            .fill(ui.visuals().faint_bg_color)
            .inner_margin(10.0)
            .corner_radius(6.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(RichText::new(review.author()).strong());
                    if let Some(created) = review.created_at {
                        ui.label(RichText::new(created.format("%d %b %Y").to_string()).weak());
                    }
                });

                egui::Grid::new(("review_ratings", &review.id))
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        let ratings = &review.ratings;
                        for (label, value) in [
                            ("Scenery", ratings.scenery),
                            ("Traffic", ratings.traffic),
                            ("Pit Stops", ratings.pit_stops),
                            ("Points of Interest", ratings.points_of_interest),
                        ] {
                            ui.label(label);
                            ui.label(star_rating(value));
                            ui.end_row();
                        }
                    });

                let report = review.ride_report.as_deref().unwrap_or_default();
                if !report.is_empty() {
                    ui.add_space(4.0);
                    let text = if self.truncate {
                        truncate_report(report)
                    } else {
                        report.to_string()
                    };
                    ui.label(text);
                }

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if self.votable && ui.small_button("▲").on_hover_text("Upvote").clicked() {
                        vote = Some(VoteDirection::Up);
                    }
                    ui.label(format!("Score: {}", review.vote_score()));
                    if self.votable && ui.small_button("▼").on_hover_text("Downvote").clicked() {
                        vote = Some(VoteDirection::Down);
                    }
                });

                if let Some(error) = self.error {
                    ui.colored_label(crate::ui::theme::status_colors::ERROR, error);
                }
            });

        vote
    }
}
