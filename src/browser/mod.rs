//! Route browsing: filtering, sorting, selection, comparison and the map trace.
//!
//! Everything here is UI-agnostic and driven by the app's frame loop; network
//! results come back as `BrowserMessage`s.

pub mod compare;
pub mod debounce;
pub mod filter;
pub mod selection;
pub mod sequence;
pub mod sort;
pub mod state;
pub mod trace;

pub use compare::{fetch_comparison, ComparisonView};
pub use debounce::Debouncer;
pub use filter::{FilterPatch, FilterState, MapBounds, RangeFilter};
pub use selection::SelectionSet;
pub use sequence::RequestSequencer;
pub use sort::{SortColumn, SortState};
pub use state::{visible_indices, BrowserMessage, ComparisonState, LoadState, RouteBrowser};
pub use trace::RouteTrace;
