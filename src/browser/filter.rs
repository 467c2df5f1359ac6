//! Client-side route predicates.
//!
//! A route is visible when every active predicate accepts it. Inactive
//! predicates (empty text, unset bounds, map toggle off) accept everything.

use crate::api::RouteSummary;

/// Difficulty slider extent.
pub const DIFFICULTY_SLIDER: (f64, f64) = (0.0, 500.0);
/// Distance slider extent in kilometres.
pub const DISTANCE_SLIDER: (f64, f64) = (0.0, 500.0);
/// Elevation gain slider extent in metres.
pub const ELEVATION_SLIDER: (f64, f64) = (0.0, 5000.0);

/// Inclusive numeric range. An unset bound is open (-inf / +inf).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    /// Range with both bounds set.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether either bound is set.
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Test a possibly-missing value.
    ///
    /// A missing value compares as 0 against the lower bound and as +inf
    /// against the upper bound, so it only survives ranges with no upper
    /// bound and a lower bound of at most zero.
    pub fn contains(&self, value: Option<f64>) -> bool {
        let above_min = match self.min {
            Some(min) => value.unwrap_or(0.0) >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) => value.is_some_and(|v| v <= max),
            None => true,
        };
        above_min && below_max
    }

    /// Build from a slider's pair of handles; a handle resting on the
    /// slider's extreme leaves that side open.
    pub fn from_slider(low: f64, high: f64, extent: (f64, f64)) -> Self {
        Self {
            min: (low > extent.0).then_some(low),
            max: (high < extent.1).then_some(high),
        }
    }

    /// Slider handle positions for this range.
    pub fn slider_values(&self, extent: (f64, f64)) -> (f64, f64) {
        (
            self.min.unwrap_or(extent.0).clamp(extent.0, extent.1),
            self.max.unwrap_or(extent.1).clamp(extent.0, extent.1),
        )
    }
}

/// Geographic viewport rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl MapBounds {
    /// Create bounds from two corners, normalising their order.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south: south.min(north),
            west: west.min(east),
            north: south.max(north),
            east: west.max(east),
        }
    }

    /// Inclusive point-in-rectangle test.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Approximate web-map zoom level for this viewport.
    pub fn zoom_level(&self) -> f64 {
        let span = self.lon_span().max(1e-9);
        (360.0 / span).log2()
    }
}

/// Current predicate parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    /// Case-insensitive substring of the route name
    pub name: String,
    /// Case-insensitive substring of the start location
    pub location: String,
    pub difficulty: RangeFilter,
    pub distance_km: RangeFilter,
    pub elevation_m: RangeFilter,
    /// Exact surface type; empty means any
    pub surface: String,
    /// Tag to match (case-insensitive, exact); empty means any
    pub tag: String,
    /// Only keep routes starting inside the map viewport
    pub within_map: bool,
}

/// Partial update to a `FilterState`. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub difficulty: Option<RangeFilter>,
    pub distance_km: Option<RangeFilter>,
    pub elevation_m: Option<RangeFilter>,
    pub surface: Option<String>,
    pub tag: Option<String>,
    pub within_map: Option<bool>,
}

impl FilterState {
    /// Apply a partial update.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(range) = patch.difficulty {
            self.difficulty = range;
        }
        if let Some(range) = patch.distance_km {
            self.distance_km = range;
        }
        if let Some(range) = patch.elevation_m {
            self.elevation_m = range;
        }
        if let Some(surface) = patch.surface {
            self.surface = surface;
        }
        if let Some(tag) = patch.tag {
            self.tag = tag;
        }
        if let Some(within_map) = patch.within_map {
            self.within_map = within_map;
        }
    }

    /// Whether any predicate would reject something.
    pub fn is_active(&self) -> bool {
        *self != FilterState::default()
    }

    /// Test one route against every predicate.
    ///
    /// `bounds` is the current viewport; the map predicate only applies when
    /// `within_map` is set and a viewport is known.
    pub fn matches(&self, route: &RouteSummary, bounds: Option<&MapBounds>) -> bool {
        contains_text(route.name.as_deref(), &self.name)
            && contains_text(route.start_location_name.as_deref(), &self.location)
            && self.matches_surface(route)
            && self.matches_tag(route)
            && self.difficulty.contains(route.difficulty_score)
            && self.distance_km.contains(route.metrics.distance_km)
            && self.elevation_m.contains(route.metrics.elevation_gain_m)
            && self.matches_map(route, bounds)
    }

    fn matches_surface(&self, route: &RouteSummary) -> bool {
        self.surface.is_empty() || route.surface_type.as_deref() == Some(self.surface.as_str())
    }

    fn matches_tag(&self, route: &RouteSummary) -> bool {
        let wanted = self.tag.trim().to_lowercase();
        wanted.is_empty() || route.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    // A route with no start coordinates cannot be placed in the viewport, so it
    // is hidden while the map filter is on and shown again once it is off.
    fn matches_map(&self, route: &RouteSummary, bounds: Option<&MapBounds>) -> bool {
        match (self.within_map, bounds) {
            (true, Some(bounds)) => route
                .start_point()
                .is_some_and(|(lat, lon)| bounds.contains(lat, lon)),
            _ => true,
        }
    }
}

fn contains_text(haystack: Option<&str>, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty()
        || haystack
            .unwrap_or_default()
            .to_lowercase()
            .contains(&needle)
}
