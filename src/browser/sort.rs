//! Single-key route ordering.

use std::cmp::Ordering;

use crate::api::RouteSummary;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    StartLocation,
    Distance,
    Elevation,
    Difficulty,
    Published,
    Creator,
}

impl SortColumn {
    /// Every column, in table order.
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Name,
        SortColumn::StartLocation,
        SortColumn::Distance,
        SortColumn::Elevation,
        SortColumn::Difficulty,
        SortColumn::Published,
        SortColumn::Creator,
    ];

    /// Column header text.
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::StartLocation => "Start",
            SortColumn::Distance => "Distance (km)",
            SortColumn::Elevation => "Ascent (m)",
            SortColumn::Difficulty => "Difficulty",
            SortColumn::Published => "Published",
            SortColumn::Creator => "Creator",
        }
    }

    /// Compare two routes by this column, ascending.
    pub fn compare(&self, a: &RouteSummary, b: &RouteSummary) -> Ordering {
        match self {
            SortColumn::Name => compare_text(a.name.as_deref(), b.name.as_deref()),
            SortColumn::StartLocation => compare_text(
                a.start_location_name.as_deref(),
                b.start_location_name.as_deref(),
            ),
            SortColumn::Creator => compare_text(
                a.creator_username.as_deref(),
                b.creator_username.as_deref(),
            ),
            SortColumn::Distance => compare_number(a.metrics.distance_km, b.metrics.distance_km),
            SortColumn::Elevation => {
                compare_number(a.metrics.elevation_gain_m, b.metrics.elevation_gain_m)
            }
            SortColumn::Difficulty => compare_number(a.difficulty_score, b.difficulty_score),
            // Missing dates sort lowest, like missing numbers
            SortColumn::Published => a.published().cmp(&b.published()),
        }
    }
}

/// Current ordering. No column means listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Select `column`: the same column flips direction, a new one starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    /// Direction marker for a column header.
    pub fn indicator(&self, column: SortColumn) -> &'static str {
        match (self.column == Some(column), self.ascending) {
            (false, _) => "",
            (true, true) => " ▲",
            (true, false) => " ▼",
        }
    }

    /// Stable in-place sort of `indices` into `routes`.
    ///
    /// Descending reverses the comparator, not the result, so equal keys keep
    /// their relative order in both directions.
    pub fn apply(&self, routes: &[RouteSummary], indices: &mut [usize]) {
        let Some(column) = self.column else {
            return;
        };
        indices.sort_by(|&a, &b| {
            let ord = column.compare(&routes[a], &routes[b]);
            if self.ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or_default().to_lowercase();
    let b = b.unwrap_or_default().to_lowercase();
    a.cmp(&b)
}

fn compare_number(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NEG_INFINITY);
    let b = b.unwrap_or(f64::NEG_INFINITY);
    a.total_cmp(&b)
}
