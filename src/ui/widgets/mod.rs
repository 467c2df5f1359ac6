//! UI widgets for reusable components.

pub mod comparison_modal;
pub mod elevation_chart;
pub mod radar_chart;
pub mod review_card;
pub mod route_map;

pub use comparison_modal::show_comparison;
pub use elevation_chart::ElevationChart;
pub use radar_chart::RadarChart;
pub use review_card::{star_rating, ReviewCard};
pub use route_map::{MapMarker, MapResponse, RouteMap};
