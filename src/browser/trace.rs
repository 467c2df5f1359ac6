//! On-demand track display for the route clicked on the map.

use super::sequence::RequestSequencer;
use crate::api::{ApiError, RouteDetail};

/// A fetch the caller should issue: `(sequence, route id)`.
pub type TraceRequest = (u64, String);

/// Selected marker and its drawn track.
#[derive(Debug, Default)]
pub struct RouteTrace {
    /// Route whose marker was last clicked
    selected: Option<String>,
    /// Drawn track as `(lat, lon)`
    points: Vec<(f64, f64)>,
    /// Route the drawn track belongs to
    drawn_for: Option<String>,
    /// Whether a fetch is outstanding
    in_flight: bool,
    seq: RequestSequencer,
}

impl RouteTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Track to draw, if any.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Marker clicked. Returns a fetch when zoomed in far enough.
    pub fn select(&mut self, id: &str, zoom: f64, threshold: f64) -> Option<TraceRequest> {
        if self.selected.as_deref() != Some(id) {
            self.clear_track();
            self.selected = Some(id.to_string());
        }
        self.on_zoom(zoom, threshold)
    }

    /// Viewport zoom changed. Clears the track below the threshold and
    /// re-requests it for the remembered selection above it.
    pub fn on_zoom(&mut self, zoom: f64, threshold: f64) -> Option<TraceRequest> {
        let id = self.selected.clone()?;

        if zoom < threshold {
            self.clear_track();
            return None;
        }
        if self.drawn_for.as_deref() == Some(id.as_str()) || self.in_flight {
            return None;
        }

        self.in_flight = true;
        Some((self.seq.next(), id))
    }

    /// Apply a fetch result. Stale results are ignored; errors are logged only.
    pub fn on_loaded(&mut self, seq: u64, result: Result<RouteDetail, ApiError>) {
        if !self.seq.is_current(seq) {
            return;
        }
        self.in_flight = false;

        match result {
            Ok(detail) => {
                if self.selected.as_deref() == Some(detail.summary.id.as_str()) {
                    self.points = detail.lat_lons();
                    self.drawn_for = Some(detail.summary.id);
                }
            }
            Err(e) => tracing::warn!("Failed to fetch route trace: {}", e),
        }
    }

    /// Forget the selection if its route is no longer visible.
    pub fn retain_visible<'a>(&mut self, mut visible: impl Iterator<Item = &'a str>) {
        if let Some(id) = self.selected.as_deref() {
            if !visible.any(|v| v == id) {
                self.clear();
            }
        }
    }

    /// Drop both the selection and the track.
    pub fn clear(&mut self) {
        self.selected = None;
        self.clear_track();
    }

    fn clear_track(&mut self) {
        self.points.clear();
        self.drawn_for = None;
        self.in_flight = false;
        self.seq.invalidate();
    }
}
