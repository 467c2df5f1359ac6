//! Local checks before a route is sent for processing.

use std::path::Path;

use thiserror::Error;

/// Submission input errors, raised before any request is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Please select a file to upload.")]
    NoFile,

    #[error("Please enter a route URL.")]
    EmptyUrl,

    #[error("Route URL must start with http:// or https://")]
    InvalidUrl,

    #[error("Failed to read file: {0}")]
    Io(String),

    #[error("GPX parse error: {0}")]
    Parse(String),

    #[error("No GPS points found in GPX file")]
    Empty,
}

/// What a GPX file contains, shown before upload.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxPreview {
    pub file_name: String,
    /// Track, route or metadata name
    pub name: Option<String>,
    pub point_count: usize,
    /// Great-circle length of the point sequence
    pub distance_km: f64,
    /// Highest minus lowest elevation, when elevations are present
    pub elevation_range_m: Option<f64>,
}

/// A file ready to upload.
#[derive(Debug, Clone)]
pub struct GpxUpload {
    pub preview: GpxPreview,
    pub contents: Vec<u8>,
}

/// Read and preview a GPX file from disk.
pub fn load_gpx(path: &Path) -> Result<GpxUpload, SubmitError> {
    let contents = std::fs::read(path).map_err(|e| SubmitError::Io(e.to_string()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "route.gpx".to_string());

    let preview = preview_gpx(&file_name, &contents)?;
    Ok(GpxUpload { preview, contents })
}

/// Parse GPX content and summarise it.
///
/// Points come from tracks, then routes, then waypoints, whichever is first
/// non-empty.
pub fn preview_gpx(file_name: &str, content: &[u8]) -> Result<GpxPreview, SubmitError> {
    let data: gpx::Gpx = gpx::read(content).map_err(|e| SubmitError::Parse(e.to_string()))?;

    let name = data
        .tracks
        .iter()
        .find_map(|t| t.name.clone())
        .or_else(|| data.routes.iter().find_map(|r| r.name.clone()))
        .or_else(|| data.metadata.as_ref().and_then(|m| m.name.clone()));

    let mut points: Vec<&gpx::Waypoint> = data
        .tracks
        .iter()
        .flat_map(|t| t.segments.iter())
        .flat_map(|s| s.points.iter())
        .collect();
    if points.is_empty() {
        points = data.routes.iter().flat_map(|r| r.points.iter()).collect();
    }
    if points.is_empty() {
        points = data.waypoints.iter().collect();
    }
    if points.is_empty() {
        return Err(SubmitError::Empty);
    }

    let distance_m: f64 = points
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0].point(), w[1].point());
            haversine_distance(a.y(), a.x(), b.y(), b.x())
        })
        .sum();

    let elevations: Vec<f64> = points.iter().filter_map(|p| p.elevation).collect();
    let elevation_range_m = if elevations.is_empty() {
        None
    } else {
        let max = elevations.iter().copied().fold(f64::MIN, f64::max);
        let min = elevations.iter().copied().fold(f64::MAX, f64::min);
        Some(max - min)
    };

    Ok(GpxPreview {
        file_name: file_name.to_string(),
        name,
        point_count: points.len(),
        distance_km: distance_m / 1000.0,
        elevation_range_m,
    })
}

/// Trim and check a route URL.
pub fn validate_route_url(input: &str) -> Result<String, SubmitError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(SubmitError::EmptyUrl);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(SubmitError::InvalidUrl);
    }
    Ok(url.to_string())
}

/// Great-circle distance in metres.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS: f64 = 6_371_000.0; // meters

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * a.sqrt().asin()
}
