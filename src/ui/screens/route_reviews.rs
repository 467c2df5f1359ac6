//! Reviews for a single route, with sorting and voting.

use std::collections::HashMap;

use egui::{RichText, ScrollArea, Ui};

use crate::api::{Review, ReviewSort, VoteDirection, VoteResult};
use crate::ui::theme::status_colors;
use crate::ui::widgets::ReviewCard;

use super::Screen;

/// Action from the reviews screen.
#[derive(Debug, Clone)]
pub enum RouteReviewsAction {
    Navigate(Screen),
    /// Fetch reviews in the given order
    Load { route_id: String, sort: ReviewSort },
    Vote {
        review_id: String,
        direction: VoteDirection,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
enum ReviewsState {
    #[default]
    Empty,
    Loading,
    Loaded(Vec<Review>),
    Failed(String),
}

/// Reviews screen state.
#[derive(Default)]
pub struct RouteReviewsScreen {
    route_id: String,
    route_name: String,
    sort: ReviewSort,
    state: ReviewsState,
    /// Per-review vote errors
    vote_errors: HashMap<String, String>,
}

impl RouteReviewsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a route. Returns the load action for it.
    pub fn open(&mut self, route_id: String, route_name: String) -> RouteReviewsAction {
        self.route_id = route_id;
        self.route_name = route_name;
        self.vote_errors.clear();
        self.begin_load()
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    fn begin_load(&mut self) -> RouteReviewsAction {
        self.state = ReviewsState::Loading;
        RouteReviewsAction::Load {
            route_id: self.route_id.clone(),
            sort: self.sort,
        }
    }

    /// Apply a fetch result for `route_id` in `sort` order; results for
    /// anything else are stale.
    pub fn set_reviews(
        &mut self,
        route_id: &str,
        sort: ReviewSort,
        result: Result<Vec<Review>, String>,
    ) {
        if route_id != self.route_id || sort != self.sort {
            return;
        }
        self.state = match result {
            Ok(reviews) => ReviewsState::Loaded(reviews),
            Err(e) => ReviewsState::Failed(e),
        };
    }

    /// Apply a vote result.
    pub fn set_vote_result(&mut self, review_id: &str, result: Result<VoteResult, String>) {
        match result {
            Ok(vote) => {
                self.vote_errors.remove(review_id);
                if let ReviewsState::Loaded(reviews) = &mut self.state {
                    if let Some(review) = reviews.iter_mut().find(|r| r.id == review_id) {
                        review.score = Some(vote.new_score);
                    }
                }
            }
            Err(e) => {
                self.vote_errors.insert(review_id.to_string(), e);
            }
        }
    }

    /// Displayed score of a review, if loaded.
    pub fn score_of(&self, review_id: &str) -> Option<i64> {
        match &self.state {
            ReviewsState::Loaded(reviews) => reviews
                .iter()
                .find(|r| r.id == review_id)
                .map(Review::vote_score),
            _ => None,
        }
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<RouteReviewsAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("← Back").clicked() {
                action = Some(RouteReviewsAction::Navigate(Screen::Browse));
            }
            ui.heading(format!("Reviews: {}", self.route_name));
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Sort:");
            for sort in [ReviewSort::Latest, ReviewSort::Top] {
                if ui.selectable_label(self.sort == sort, sort.label()).clicked() && self.sort != sort
                {
                    self.sort = sort;
                    action = Some(self.begin_load());
                }
            }
        });
        ui.separator();

        match &self.state {
            ReviewsState::Empty => {}
            ReviewsState::Loading => {
                ui.spinner();
            }
            ReviewsState::Failed(message) => {
                ui.colored_label(
                    status_colors::ERROR,
                    format!("Error loading reviews: {}", message),
                );
            }
            ReviewsState::Loaded(reviews) if reviews.is_empty() => {
                ui.label(RichText::new("No reviews yet. Be the first to write one on the website!").weak());
            }
            ReviewsState::Loaded(reviews) => {
                ScrollArea::vertical().show(ui, |ui| {
                    for review in reviews {
                        let error = self.vote_errors.get(&review.id).map(String::as_str);
                        if let Some(direction) = ReviewCard::new(review)
                            .votable(true)
                            .error(error)
                            .show(ui)
                        {
                            action = Some(RouteReviewsAction::Vote {
                                review_id: review.id.clone(),
                                direction,
                            });
                        }
                        ui.add_space(6.0);
                    }
                });
            }
        }

        action
    }
}
