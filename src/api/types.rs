//! Wire types for the route sharing REST API.
//!
//! The site serves documents straight out of its database, so identifiers may
//! arrive either as plain strings or as `{"$oid": "..."}` objects, and dates in
//! whichever format the server's JSON encoder produced. Listing fields are read
//! leniently: a malformed optional field becomes `None` (or its default) instead
//! of failing the whole listing. Only a missing or unusable `_id` rejects a
//! document.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Start (or any) coordinate pair. Either half may be missing in stored data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
}

impl Coordinates {
    /// Create a complete coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// Returns `(lat, lon)` when both halves are present.
    pub fn point(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Elevation and gradient metrics computed by the backend.
///
/// TEGa/ACg/MCg/ADg are opaque backend names; the client only displays and
/// normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Total distance in kilometres
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance_km: Option<f64>,
    /// Total elevation gain (TEGa) in metres
    #[serde(rename = "TEGa", default, deserialize_with = "lenient_f64")]
    pub elevation_gain_m: Option<f64>,
    /// Average climbing gradient (ACg) in percent
    #[serde(rename = "ACg", default, deserialize_with = "lenient_f64")]
    pub avg_climb_gradient: Option<f64>,
    /// Maximum climbing gradient (MCg) in percent
    #[serde(rename = "MCg", default, deserialize_with = "lenient_f64")]
    pub max_climb_gradient: Option<f64>,
    /// Average descending gradient (ADg) in percent, usually negative
    #[serde(rename = "ADg", default, deserialize_with = "lenient_f64")]
    pub avg_descent_gradient: Option<f64>,
}

/// Lightweight record describing one published ride, as served by the listing
/// endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route identifier
    #[serde(rename = "_id", deserialize_with = "object_id")]
    pub id: String,
    /// Display name
    #[serde(rename = "route_name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Human-readable start location
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_location_name: Option<String>,
    /// Start coordinates (used for map markers)
    #[serde(default, deserialize_with = "lenient_object")]
    pub start_coordinates: Option<Coordinates>,
    /// Metrics bag
    #[serde(rename = "metrics_summary", default, deserialize_with = "lenient_metrics")]
    pub metrics: RouteMetrics,
    /// Precomputed difficulty rating
    #[serde(default, deserialize_with = "lenient_f64")]
    pub difficulty_score: Option<f64>,
    /// Surface type (e.g. "Road", "Gravel")
    #[serde(default, deserialize_with = "lenient_string")]
    pub surface_type: Option<String>,
    /// Free-form tags
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    /// When the route was published
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    /// When the route finished processing (fallback for older routes)
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub processed_at: Option<DateTime<Utc>>,
    /// Creator's username
    #[serde(default, deserialize_with = "lenient_string")]
    pub creator_username: Option<String>,
}

impl RouteSummary {
    /// Name to display, falling back to "Unnamed".
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }

    /// Publication date, falling back to the processing date.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.processed_at)
    }

    /// Start position as `(lat, lon)` if known.
    pub fn start_point(&self) -> Option<(f64, f64)> {
        self.start_coordinates.and_then(|c| c.point())
    }
}

/// One sample along a route's track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackPoint {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    /// Cumulative distance from the start in kilometres
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dist: Option<f64>,
    /// Elevation in metres
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ele: Option<f64>,
}

/// Full route document including the track.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub summary: RouteSummary,
    #[serde(default, deserialize_with = "lenient_list")]
    pub track_points: Vec<TrackPoint>,
    /// Best review, attached client-side when building a comparison
    #[serde(skip)]
    pub top_review: Option<Review>,
}

impl RouteDetail {
    /// Track as `(lat, lon)` pairs, skipping incomplete points.
    pub fn lat_lons(&self) -> Vec<(f64, f64)> {
        self.track_points
            .iter()
            .filter_map(|p| match (p.lat, p.lon) {
                (Some(lat), Some(lon)) => Some((lat, lon)),
                _ => None,
            })
            .collect()
    }
}

/// Star ratings attached to a review (1-5, absent when not rated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewRatings {
    #[serde(default, deserialize_with = "lenient_rating")]
    pub scenery: Option<u8>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub traffic: Option<u8>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub pit_stops: Option<u8>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub points_of_interest: Option<u8>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub perceived_difficulty: Option<u8>,
}

/// A rider's review of a route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", deserialize_with = "object_id")]
    pub id: String,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub ride_report: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ratings: ReviewRatings,
    /// Voter ids; only the count matters to the client
    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downvotes: Vec<Value>,
    /// Precomputed score (present on top-review responses)
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Net vote score, preferring the server-computed value.
    pub fn vote_score(&self) -> i64 {
        self.score
            .unwrap_or(self.upvotes.len() as i64 - self.downvotes.len() as i64)
    }

    /// Author name, falling back to "Anonymous".
    pub fn author(&self) -> &str {
        self.creator_username.as_deref().unwrap_or("Anonymous")
    }
}

/// Ordering requested from the reviews endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    #[default]
    Latest,
    Top,
}

impl ReviewSort {
    /// Query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSort::Latest => "latest",
            ReviewSort::Top => "top",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewSort::Latest => "Latest",
            ReviewSort::Top => "Top rated",
        }
    }
}

/// Vote direction on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// Response to a vote.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoteResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub new_score: i64,
    #[serde(default)]
    pub upvotes: Option<u32>,
    #[serde(default)]
    pub downvotes: Option<u32>,
}

/// Response to a job submission.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TaskSubmitted {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Background job state as reported by the task queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Started,
    Progress,
    Retry,
    Success,
    Failure,
    Revoked,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Whether the job will not change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Success | TaskState::Failure | TaskState::Revoked
        )
    }
}

/// Response of the task status endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    /// Progress or failure message
    #[serde(default)]
    pub status: Option<String>,
    /// Result payload on success
    #[serde(default)]
    pub result: Option<Value>,
}

impl TaskStatus {
    /// Draft id produced by a successful processing job.
    pub fn draft_id(&self) -> Option<String> {
        let id = self.result.as_ref()?.get("draft_id")?;
        match id {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("$oid")?.as_str().map(str::to_string),
            other => Some(other.to_string()),
        }
    }
}

/// Error body returned by the site on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Accept `"abc"`, `{"$oid": "abc"}` or a bare number as an identifier.
fn object_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Object(map) => map
            .get("$oid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| serde::de::Error::custom("object id without $oid")),
        other => Err(serde::de::Error::custom(format!(
            "invalid object id: {}",
            other
        ))),
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Number, or a numeric string; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// String, or a number rendered as text; anything else becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Nested object that is dropped when it is not an object.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_metrics<'de, D>(deserializer: D) -> Result<RouteMetrics, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_object(deserializer)?.unwrap_or_default())
}

/// Array whose malformed entries are skipped; a non-array becomes empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Parse the date formats the site has been seen to emit.
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive ISO timestamps from the database are UTC
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_datetime(&s),
        Some(Value::Object(map)) => match map.get("$date") {
            Some(Value::String(s)) => parse_datetime(s),
            Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let rating = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(rating
        .filter(|r| (1.0..=5.0).contains(r))
        .map(|r| r.round() as u8))
}
