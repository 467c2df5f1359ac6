//! Route browser state container.
//!
//! All mutation goes through `update` with a `BrowserMessage`; the visible
//! list is always re-derived from scratch by `visible_indices`.

use std::collections::HashSet;

use super::compare::ComparisonView;
use super::filter::{FilterPatch, FilterState, MapBounds};
use super::selection::SelectionSet;
use super::sequence::RequestSequencer;
use super::sort::{SortColumn, SortState};
use crate::api::{ApiError, RouteSummary};

/// Lifecycle of the route listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadFailed(String),
}

/// Lifecycle of the comparison modal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ComparisonState {
    #[default]
    Closed,
    Loading,
    Ready {
        view: Box<ComparisonView>,
        /// Unique per view instance; salts chart ids
        generation: u64,
    },
    Failed(String),
}

/// Inputs to the browser.
#[derive(Debug, Clone)]
pub enum BrowserMessage {
    /// Listing fetch finished
    Loaded {
        seq: u64,
        result: Result<Vec<RouteSummary>, ApiError>,
    },
    SetFilter(FilterPatch),
    ResetFilters,
    SetSort(SortColumn),
    ToggleSelection(String),
    ClearSelection,
    SelectAllVisible,
    /// Debounced map viewport
    MapMoved(MapBounds),
    /// Comparison fetch finished
    ComparisonLoaded {
        seq: u64,
        result: Result<ComparisonView, ApiError>,
    },
    CloseComparison,
}

/// Filter, sort and selection state over one loaded route collection.
#[derive(Debug, Default)]
pub struct RouteBrowser {
    routes: Vec<RouteSummary>,
    /// Indices into `routes`, filtered and ordered
    visible: Vec<usize>,
    filter: FilterState,
    sort: SortState,
    selection: SelectionSet,
    map_bounds: Option<MapBounds>,
    load_state: LoadState,
    comparison: ComparisonState,
    load_seq: RequestSequencer,
    compare_seq: RequestSequencer,
}

/// Pure derivation of the visible list.
pub fn visible_indices(
    routes: &[RouteSummary],
    filter: &FilterState,
    sort: &SortState,
    bounds: Option<&MapBounds>,
) -> Vec<usize> {
    let mut indices: Vec<usize> = routes
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r, bounds))
        .map(|(i, _)| i)
        .collect();
    sort.apply(routes, &mut indices);
    indices
}

impl RouteBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn comparison(&self) -> &ComparisonState {
        &self.comparison
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn map_bounds(&self) -> Option<&MapBounds> {
        self.map_bounds.as_ref()
    }

    /// Every loaded route, in listing order.
    pub fn all_routes(&self) -> &[RouteSummary] {
        &self.routes
    }

    /// Visible routes in display order.
    pub fn visible(&self) -> impl Iterator<Item = &RouteSummary> + '_ {
        self.visible.iter().map(|&i| &self.routes[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Distinct surface types present in the collection, sorted.
    pub fn surface_types(&self) -> Vec<String> {
        let mut surfaces: Vec<String> = self
            .routes
            .iter()
            .filter_map(|r| r.surface_type.clone())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        surfaces.sort();
        surfaces
    }

    /// Enter `Loading` and return the sequence number for the fetch.
    ///
    /// The previously loaded list stays visible until the result arrives.
    pub fn begin_load(&mut self) -> u64 {
        self.load_state = LoadState::Loading;
        self.load_seq.next()
    }

    /// Start a comparison of the selected routes. Returns the sequence number
    /// and ids in display order, or `None` when fewer than two are selected.
    ///
    /// Any previous view is dropped before the new request goes out.
    pub fn begin_compare(&mut self) -> Option<(u64, Vec<String>)> {
        if self.load_state != LoadState::Loaded || !self.selection.can_compare() {
            return None;
        }
        let ids = self.comparison_ids();
        self.comparison = ComparisonState::Loading;
        Some((self.compare_seq.next(), ids))
    }

    /// Selected ids ordered as they appear in the table.
    pub fn comparison_ids(&self) -> Vec<String> {
        self.visible()
            .filter(|r| self.selection.contains(&r.id))
            .map(|r| r.id.clone())
            .collect()
    }

    /// Apply one message.
    pub fn update(&mut self, message: BrowserMessage) {
        match message {
            BrowserMessage::Loaded { seq, result } => self.on_loaded(seq, result),
            BrowserMessage::ComparisonLoaded { seq, result } => {
                self.on_comparison_loaded(seq, result)
            }
            BrowserMessage::CloseComparison => {
                self.compare_seq.invalidate();
                self.comparison = ComparisonState::Closed;
            }
            BrowserMessage::MapMoved(bounds) => {
                self.map_bounds = Some(bounds);
                if self.load_state == LoadState::Loaded && self.filter.within_map {
                    self.recompute();
                }
            }
            other => {
                if self.load_state != LoadState::Loaded {
                    tracing::debug!("Ignoring {:?} while {:?}", other, self.load_state);
                    return;
                }
                self.apply_interaction(other);
            }
        }
    }

    fn apply_interaction(&mut self, message: BrowserMessage) {
        match message {
            BrowserMessage::SetFilter(patch) => {
                self.filter.merge(patch);
                self.recompute();
            }
            BrowserMessage::ResetFilters => {
                self.filter = FilterState::default();
                self.sort = SortState::default();
                self.recompute();
            }
            BrowserMessage::SetSort(column) => {
                self.sort.toggle(column);
                self.recompute();
            }
            BrowserMessage::ToggleSelection(id) => {
                if self.visible().any(|r| r.id == id) {
                    self.selection.toggle(&id);
                }
            }
            BrowserMessage::ClearSelection => self.selection.clear(),
            BrowserMessage::SelectAllVisible => {
                for &i in &self.visible {
                    self.selection.insert(&self.routes[i].id);
                }
            }
            _ => {}
        }
    }

    fn on_loaded(&mut self, seq: u64, result: Result<Vec<RouteSummary>, ApiError>) {
        if !self.load_seq.is_current(seq) {
            tracing::debug!("Discarding stale route listing (seq {})", seq);
            return;
        }

        match result {
            Ok(routes) => {
                tracing::info!("Loaded {} routes", routes.len());
                self.routes = routes;
                self.filter = FilterState::default();
                self.sort = SortState::default();
                self.load_state = LoadState::Loaded;
                self.recompute();
            }
            Err(e) => {
                tracing::warn!("Failed to load routes: {}", e);
                self.load_state = LoadState::LoadFailed(e.to_string());
            }
        }
    }

    fn on_comparison_loaded(&mut self, seq: u64, result: Result<ComparisonView, ApiError>) {
        if !self.compare_seq.is_current(seq) {
            tracing::debug!("Discarding stale comparison (seq {})", seq);
            return;
        }

        self.comparison = match result {
            Ok(view) => ComparisonState::Ready {
                view: Box::new(view),
                generation: seq,
            },
            Err(e) => {
                tracing::warn!("Comparison failed: {}", e);
                ComparisonState::Failed(e.to_string())
            }
        };
    }

    /// Re-derive the visible list and prune selections that fell out of it.
    fn recompute(&mut self) {
        self.visible = visible_indices(
            &self.routes,
            &self.filter,
            &self.sort,
            self.map_bounds.as_ref(),
        );

        let visible_ids: HashSet<&str> = self
            .visible
            .iter()
            .map(|&i| self.routes[i].id.as_str())
            .collect();
        let pruned = self.selection.retain(|id| visible_ids.contains(id));
        if pruned > 0 {
            tracing::debug!("Pruned {} hidden routes from selection", pruned);
        }
    }
}
