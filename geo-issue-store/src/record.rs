//! Stored issue model and its Qdrant payload mapping.

use chrono::{DateTime, Utc};
use issue_triage::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::StoreError;

/// GeoJSON `Point`; `coordinates` is `[longitude, latitude]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: GeoJsonKind,
    pub coordinates: [f64; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoJsonKind {
    Point,
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(p: GeoPoint) -> Self {
        Self {
            kind: GeoJsonKind::Point,
            coordinates: p.to_geojson(),
        }
    }
}

impl From<GeoJsonPoint> for GeoPoint {
    fn from(p: GeoJsonPoint) -> Self {
        GeoPoint::from_geojson(p.coordinates)
    }
}

/// One stored civic issue, as much as the duplicate lookup needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: String,
    pub category: String,
    pub title: String,
    pub location: GeoJsonPoint,
    pub created_at: DateTime<Utc>,
}

impl IssueRecord {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
        location: GeoPoint,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            title: title.into(),
            location: location.into(),
            created_at,
        }
    }

    pub fn point(&self) -> GeoPoint {
        self.location.into()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.id.trim().is_empty() {
            return Err(StoreError::InvalidRecord("id is empty".into()));
        }
        if self.category.trim().is_empty() {
            return Err(StoreError::InvalidRecord("category is empty".into()));
        }
        if !self.point().is_valid() {
            return Err(StoreError::InvalidRecord(format!(
                "location out of range: {:?}",
                self.location.coordinates
            )));
        }
        Ok(())
    }

    /// Qdrant payload. Geo indexes want `{lon, lat}` objects, and the recency
    /// filter needs an integer timestamp.
    pub fn to_payload_json(&self) -> Value {
        let p = self.point();
        json!({
            "issue_id": self.id,
            "category": self.category,
            "title": self.title,
            "location": { "lon": p.lon, "lat": p.lat },
            "created_at_ts": self.created_at.timestamp(),
        })
    }

    /// Inverse of [`IssueRecord::to_payload_json`].
    pub fn from_payload_json(v: &Value) -> Result<Self, StoreError> {
        let field = |name: &str| {
            v.get(name)
                .ok_or_else(|| StoreError::InvalidRecord(format!("payload lacks `{name}`")))
        };
        let text = |name: &str| {
            field(name)?
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| StoreError::InvalidRecord(format!("`{name}` is not a string")))
        };

        let loc = field("location")?;
        let coord = |axis: &str| {
            loc.get(axis)
                .and_then(Value::as_f64)
                .ok_or_else(|| StoreError::InvalidRecord(format!("location.{axis} missing")))
        };
        let ts = field("created_at_ts")?
            .as_i64()
            .ok_or_else(|| StoreError::InvalidRecord("created_at_ts is not an integer".into()))?;
        let created_at = DateTime::<Utc>::from_timestamp(ts, 0)
            .ok_or_else(|| StoreError::InvalidRecord(format!("timestamp {ts} out of range")))?;

        Ok(Self::new(
            text("issue_id")?,
            text("category")?,
            text("title")?,
            GeoPoint::new(coord("lon")?, coord("lat")?),
            created_at,
        ))
    }
}
