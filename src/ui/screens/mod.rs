//! UI screens for the application.

pub mod route_browser;
pub mod route_reviews;
pub mod route_submit;

pub use route_browser::{RouteBrowserAction, RouteBrowserScreen};
pub use route_reviews::{RouteReviewsAction, RouteReviewsScreen};
pub use route_submit::{JobStatus, RouteSubmitAction, RouteSubmitScreen};

/// Screen navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Route table and map
    #[default]
    Browse,
    /// GPX / URL submission
    Submit,
    /// Reviews for one route
    Reviews,
}

impl Screen {
    /// Tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Browse => "Browse",
            Screen::Submit => "Add Route",
            Screen::Reviews => "Reviews",
        }
    }
}
