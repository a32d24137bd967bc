//! Activity records as handed over by the fetching layer.
//!
//! The record is read-only input. Besides its own field names, the JSON form
//! accepts the activity objects of common fitness APIs:
//!
//! | Field | Also read from |
//! |-------|----------------|
//! | `type` | `sport_type` (used when `type` is absent or unrecognized) |
//! | `encoded_path` | `encodedPath`, `summary_polyline`, `map.summary_polyline`, `map.polyline` |
//! | `elevation_samples` | `elevationSamples`, `streams.altitude.data` |
//! | `distance` | `distance_m` |
//! | `moving_time` | `moving_time_s` |

use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};

/// Activity kinds with their own presentation. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityType {
    Run,
    Ride,
    Swim,
    #[default]
    #[serde(other)]
    Other,
}

impl ActivityType {
    /// Parse an API sport label. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Run" => ActivityType::Run,
            "Ride" => ActivityType::Ride,
            "Swim" => ActivityType::Swim,
            other => {
                debug!(
                    "[ActivityGeometry] Unrecognized activity type '{}', using Other",
                    other
                );
                ActivityType::Other
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Run => "Run",
            ActivityType::Ride => "Ride",
            ActivityType::Swim => "Swim",
            ActivityType::Other => "Other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityJson")]
pub struct ActivityRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u32,
    /// Encoded polyline of the route, if the activity has GPS data
    pub encoded_path: Option<String>,
    /// Elevation in meters, one sample per decoded path point
    pub elevation_samples: Option<Vec<f64>>,
    pub start_date: DateTime<Utc>,
}

// ============================================================================
// Wire Format
// ============================================================================

/// Accepted JSON shape of an activity, before fallbacks are resolved.
#[derive(Deserialize)]
struct ActivityJson {
    name: String,
    #[serde(rename = "type", default)]
    activity_type: Option<ActivityType>,
    #[serde(default)]
    sport_type: Option<ActivityType>,
    #[serde(alias = "distance_m")]
    distance: f64,
    #[serde(alias = "moving_time_s")]
    moving_time: u32,
    #[serde(default, alias = "encodedPath")]
    encoded_path: Option<String>,
    #[serde(default)]
    summary_polyline: Option<String>,
    #[serde(default)]
    map: Option<ActivityMap>,
    #[serde(default, alias = "elevationSamples")]
    elevation_samples: Option<Vec<f64>>,
    #[serde(default)]
    streams: Option<ActivityStreams>,
    start_date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ActivityMap {
    #[serde(default)]
    summary_polyline: Option<String>,
    #[serde(default)]
    polyline: Option<String>,
}

#[derive(Deserialize)]
struct ActivityStreams {
    #[serde(default)]
    altitude: Option<DataStream>,
}

#[derive(Deserialize)]
struct DataStream {
    data: Vec<f64>,
}

impl From<ActivityJson> for ActivityRecord {
    fn from(json: ActivityJson) -> Self {
        // A specific label wins over Other, whichever key carried it
        let activity_type = [json.activity_type, json.sport_type]
            .into_iter()
            .flatten()
            .find(|t| *t != ActivityType::Other)
            .unwrap_or_default();

        let (map_summary, map_full) = match json.map {
            Some(map) => (map.summary_polyline, map.polyline),
            None => (None, None),
        };
        let encoded_path = [json.encoded_path, json.summary_polyline, map_summary, map_full]
            .into_iter()
            .flatten()
            .find(|p| !p.is_empty());

        let elevation_samples = json.elevation_samples.or_else(|| {
            json.streams
                .and_then(|streams| streams.altitude)
                .map(|altitude| altitude.data)
        });

        Self {
            name: json.name,
            activity_type,
            distance: json.distance,
            moving_time: json.moving_time,
            encoded_path,
            elevation_samples,
            start_date: json.start_date,
        }
    }
}

impl ActivityRecord {
    /// Start building a record. Distance and moving time default to 0 and the
    /// start date to the Unix epoch.
    pub fn builder(name: &str, activity_type: ActivityType) -> ActivityRecordBuilder {
        ActivityRecordBuilder {
            record: ActivityRecord {
                name: name.to_string(),
                activity_type,
                distance: 0.0,
                moving_time: 0,
                encoded_path: None,
                elevation_samples: None,
                start_date: DateTime::<Utc>::default(),
            },
        }
    }

    /// Parse and validate a record from JSON.
    ///
    /// Missing required fields and bad values both come back as
    /// [`VizError::InvalidActivity`].
    pub fn from_json(json: &str) -> Result<Self> {
        let record: ActivityRecord =
            serde_json::from_str(json).map_err(|e| VizError::InvalidActivity {
                message: e.to_string(),
            })?;
        record.validate()?;
        Ok(record)
    }

    /// Check the scalar fields the geometry formulas depend on.
    pub fn validate(&self) -> Result<()> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(VizError::InvalidActivity {
                message: format!(
                    "distance must be a non-negative number of meters, got {}",
                    self.distance
                ),
            });
        }
        Ok(())
    }

    /// Whether there is anything to decode.
    pub fn has_path(&self) -> bool {
        self.encoded_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.moving_time as f64 / 60.0
    }

    /// Caption data shown next to the rendered activity.
    pub fn summary(&self, path_length_km: Option<f64>) -> ActivitySummary {
        ActivitySummary {
            activity_name: self.name.clone(),
            activity_type: self.activity_type,
            distance_km: self.distance_km(),
            duration_minutes: self.duration_minutes().round() as u32,
            start_date: self.start_date,
            path_length_km,
        }
    }
}

/// Fluent construction of [`ActivityRecord`] values.
#[derive(Debug, Clone)]
pub struct ActivityRecordBuilder {
    record: ActivityRecord,
}

impl ActivityRecordBuilder {
    pub fn distance(mut self, meters: f64) -> Self {
        self.record.distance = meters;
        self
    }

    pub fn moving_time(mut self, seconds: u32) -> Self {
        self.record.moving_time = seconds;
        self
    }

    pub fn encoded_path(mut self, encoded: &str) -> Self {
        self.record.encoded_path = Some(encoded.to_string());
        self
    }

    pub fn elevation_samples(mut self, samples: Vec<f64>) -> Self {
        self.record.elevation_samples = Some(samples);
        self
    }

    pub fn start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.record.start_date = start_date;
        self
    }

    pub fn build(self) -> ActivityRecord {
        self.record
    }
}

/// Caption for a visualized activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub activity_name: String,
    pub activity_type: ActivityType,
    pub distance_km: f64,
    /// Moving time rounded to whole minutes
    pub duration_minutes: u32,
    pub start_date: DateTime<Utc>,
    /// Haversine length of the decoded path, when one was used
    pub path_length_km: Option<f64>,
}

impl ActivitySummary {
    /// Distance with two decimals, e.g. `"10.00"`.
    pub fn distance_label(&self) -> String {
        format!("{:.2}", self.distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(ActivityType::from_label("Run"), ActivityType::Run);
        assert_eq!(ActivityType::from_label("Ride"), ActivityType::Ride);
        assert_eq!(ActivityType::from_label("Swim"), ActivityType::Swim);
        assert_eq!(ActivityType::from_label("Kayaking"), ActivityType::Other);
        assert_eq!(ActivityType::from_label("run"), ActivityType::Other);
    }

    #[test]
    fn test_from_json_strava_shape() {
        let json = r#"{
            "name": "Lunch Ride",
            "type": "Ride",
            "distance": 24500.5,
            "moving_time": 3600,
            "summary_polyline": "_p~iF~ps|U_ulLnnqC",
            "start_date": "2024-05-01T12:30:00Z"
        }"#;
        let record = ActivityRecord::from_json(json).unwrap();
        assert_eq!(record.activity_type, ActivityType::Ride);
        assert_eq!(record.encoded_path.as_deref(), Some("_p~iF~ps|U_ulLnnqC"));
        assert!(record.elevation_samples.is_none());
        assert!(record.has_path());
    }

    #[test]
    fn test_from_json_nested_api_shape() {
        // Both type keys, path under `map`, altitude under `streams`
        let json = r#"{
            "name": "Lunch Ride",
            "type": "Ride",
            "sport_type": "Ride",
            "distance": 24500.5,
            "moving_time": 3600,
            "map": {"id": "a123", "summary_polyline": "_p~iF~ps|U_ulLnnqC"},
            "streams": {"altitude": {"data": [120.0, 180.5]}},
            "start_date": "2024-05-01T12:30:00Z"
        }"#;
        let record = ActivityRecord::from_json(json).unwrap();
        assert_eq!(record.activity_type, ActivityType::Ride);
        assert_eq!(record.encoded_path.as_deref(), Some("_p~iF~ps|U_ulLnnqC"));
        assert_eq!(record.elevation_samples, Some(vec![120.0, 180.5]));
    }

    #[test]
    fn test_from_json_sport_type_fallback() {
        let json = r#"{
            "name": "Trail",
            "type": "Hike",
            "sport_type": "Run",
            "distance": 8000,
            "moving_time": 2700,
            "map": {"summary_polyline": "", "polyline": "_p~iF~ps|U_ulLnnqC"},
            "start_date": "2024-05-01T12:30:00Z"
        }"#;
        let record = ActivityRecord::from_json(json).unwrap();
        assert_eq!(record.activity_type, ActivityType::Run);
        assert_eq!(record.encoded_path.as_deref(), Some("_p~iF~ps|U_ulLnnqC"));
        assert!(record.elevation_samples.is_none());
    }

    #[test]
    fn test_json_round_trip_keeps_record() {
        let record = ActivityRecord::builder("Swim", ActivityType::Swim)
            .distance(1_500.0)
            .moving_time(1_800)
            .encoded_path("_p~iF~ps|U_ulLnnqC")
            .elevation_samples(vec![0.0, 0.0])
            .build();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(ActivityRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_from_json_unknown_type_is_other() {
        let json = r#"{
            "name": "Paddle",
            "type": "Kayaking",
            "distance": 5000,
            "moving_time": 1800,
            "start_date": "2024-05-01T12:30:00Z"
        }"#;
        let record = ActivityRecord::from_json(json).unwrap();
        assert_eq!(record.activity_type, ActivityType::Other);
        assert!(!record.has_path());
    }

    #[test]
    fn test_from_json_missing_field_is_invalid() {
        let json = r#"{"name": "No distance", "type": "Run", "moving_time": 60,
                       "start_date": "2024-05-01T12:30:00Z"}"#;
        assert!(matches!(
            ActivityRecord::from_json(json),
            Err(VizError::InvalidActivity { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_distance() {
        let record = ActivityRecord::builder("Backwards", ActivityType::Run)
            .distance(-5.0)
            .build();
        assert!(matches!(
            record.validate(),
            Err(VizError::InvalidActivity { .. })
        ));
    }

    #[test]
    fn test_empty_path_is_no_path() {
        let record = ActivityRecord::builder("Indoor", ActivityType::Ride)
            .encoded_path("")
            .build();
        assert!(!record.has_path());
    }

    #[test]
    fn test_summary_units() {
        let record = ActivityRecord::builder("Tempo", ActivityType::Run)
            .distance(10_000.0)
            .moving_time(3_029)
            .build();
        let summary = record.summary(None);
        assert_eq!(summary.distance_label(), "10.00");
        assert_eq!(summary.duration_minutes, 50);
        assert_eq!(summary.activity_type, ActivityType::Run);
    }
}
