//! Multi-route comparison: fetching and the derived chart/table data.

use crate::api::{ApiError, RouteApi, RouteDetail, RouteMetrics};

use super::selection::MIN_COMPARE;

/// Review text longer than this is cut on the cards.
pub const REPORT_PREVIEW_CHARS: usize = 200;

/// One spoke of the radar chart.
pub struct RadarAxis {
    pub label: &'static str,
    /// Reference maximum; values at or above it plot at 100
    pub max: f64,
    value: fn(&RouteMetrics) -> Option<f64>,
}

impl RadarAxis {
    /// Raw metric for this axis.
    pub fn value(&self, metrics: &RouteMetrics) -> Option<f64> {
        (self.value)(metrics)
    }

    /// Metric scaled to 0..=100 against the reference maximum. Missing is 0.
    pub fn normalize(&self, metrics: &RouteMetrics) -> f64 {
        normalize(self.value(metrics), self.max)
    }
}

pub const RADAR_AXES: [RadarAxis; 5] = [
    RadarAxis {
        label: "Distance",
        max: 250.0,
        value: |m| m.distance_km,
    },
    RadarAxis {
        label: "Ascent",
        max: 4500.0,
        value: |m| m.elevation_gain_m,
    },
    RadarAxis {
        label: "Avg Climb %",
        max: 10.0,
        value: |m| m.avg_climb_gradient,
    },
    RadarAxis {
        label: "Max Climb %",
        max: 25.0,
        value: |m| m.max_climb_gradient,
    },
    // Descent gradients are negative; compare their magnitude
    RadarAxis {
        label: "Avg Descent %",
        max: 8.0,
        value: |m| m.avg_descent_gradient.map(f64::abs),
    },
];

/// `min(value, max) / max * 100`, with missing or negative values at 0.
pub fn normalize(value: Option<f64>, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && max > 0.0 => (v.min(max) / max * 100.0).max(0.0),
        _ => 0.0,
    }
}

/// Gradient in percent between two track samples (`dist` in km, `ele` in m).
pub fn gradient_percent(prev: (f64, f64), current: (f64, f64)) -> f64 {
    let delta_dist_m = (current.0 - prev.0) * 1000.0;
    // Non-monotonic tracks report a flat gradient
    if delta_dist_m <= 0.0 {
        return 0.0;
    }
    (current.1 - prev.1) / delta_dist_m * 100.0
}

/// Legend label for the route at `index`. Numbered so that routes sharing a
/// display name (e.g. several "Unnamed") stay distinct in legends and hovers.
pub fn series_label(index: usize, name: &str) -> String {
    format!("{}. {}", index + 1, name)
}

/// Cut a ride report for card display.
pub fn truncate_report(report: &str) -> String {
    if report.chars().count() > REPORT_PREVIEW_CHARS {
        let cut: String = report.chars().take(REPORT_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        report.to_string()
    }
}

/// One row of the metric table: a label and one formatted cell per route.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub cells: Vec<String>,
}

/// Radar values for one route, in `RADAR_AXES` order.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub route_id: String,
    pub name: String,
    pub values: [f64; 5],
}

/// One point of an elevation profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationSample {
    pub dist_km: f64,
    pub ele_m: f64,
    /// Gradient from the previous sample, in percent
    pub gradient_pct: f64,
}

/// Elevation profile for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSeries {
    pub route_id: String,
    pub name: String,
    pub samples: Vec<ElevationSample>,
}

impl ElevationSeries {
    /// Build from track points, skipping samples without distance or elevation.
    pub fn from_detail(detail: &RouteDetail) -> Self {
        let mut samples = Vec::with_capacity(detail.track_points.len());
        let mut prev: Option<(f64, f64)> = None;

        for point in &detail.track_points {
            let (Some(dist), Some(ele)) = (point.dist, point.ele) else {
                continue;
            };
            let gradient_pct = prev.map_or(0.0, |p| gradient_percent(p, (dist, ele)));
            samples.push(ElevationSample {
                dist_km: dist,
                ele_m: ele,
                gradient_pct,
            });
            prev = Some((dist, ele));
        }

        Self {
            route_id: detail.summary.id.clone(),
            name: detail.summary.display_name().to_string(),
            samples,
        }
    }

    /// Sample closest to `dist_km`, for hover readouts.
    pub fn nearest(&self, dist_km: f64) -> Option<&ElevationSample> {
        self.samples.iter().min_by(|a, b| {
            (a.dist_km - dist_km)
                .abs()
                .total_cmp(&(b.dist_km - dist_km).abs())
        })
    }
}

/// Everything the comparison modal renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    /// Routes in requested order, each with its top review attached
    pub routes: Vec<RouteDetail>,
    pub metric_rows: Vec<MetricRow>,
    pub radar: Vec<RadarSeries>,
    pub elevation: Vec<ElevationSeries>,
}

impl ComparisonView {
    pub fn build(routes: Vec<RouteDetail>) -> Self {
        let metric_rows = vec![
            MetricRow {
                label: "Difficulty Score",
                cells: routes
                    .iter()
                    .map(|r| format_metric(r.summary.difficulty_score, 2))
                    .collect(),
            },
            MetricRow {
                label: "Distance (km)",
                cells: routes
                    .iter()
                    .map(|r| format_metric(r.summary.metrics.distance_km, 2))
                    .collect(),
            },
            MetricRow {
                label: "Total Ascent (m)",
                cells: routes
                    .iter()
                    .map(|r| format_metric(r.summary.metrics.elevation_gain_m, 0))
                    .collect(),
            },
        ];

        let radar = routes
            .iter()
            .map(|r| RadarSeries {
                route_id: r.summary.id.clone(),
                name: r.summary.display_name().to_string(),
                values: RADAR_AXES.each_ref().map(|axis| axis.normalize(&r.summary.metrics)),
            })
            .collect();

        let elevation = routes.iter().map(ElevationSeries::from_detail).collect();

        Self {
            routes,
            metric_rows,
            radar,
            elevation,
        }
    }
}

fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

/// Fetch details and top reviews for `ids` and build the comparison.
///
/// All-or-nothing: any request failure, or a requested id missing from the
/// detail response, aborts without a partial view.
pub async fn fetch_comparison<A: RouteApi>(
    api: &A,
    ids: &[String],
) -> Result<ComparisonView, ApiError> {
    if ids.len() < MIN_COMPARE {
        return Err(ApiError::Rejected(
            "Select at least two routes to compare.".to_string(),
        ));
    }

    let (details, mut top_reviews) =
        futures::try_join!(api.compare_data(ids), api.top_reviews(ids))?;

    let mut routes = Vec::with_capacity(ids.len());
    for id in ids {
        let mut detail = details
            .iter()
            .find(|d| &d.summary.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;
        detail.top_review = top_reviews.remove(id);
        routes.push(detail);
    }

    tracing::debug!("Built comparison for {} routes", routes.len());
    Ok(ComparisonView::build(routes))
}
