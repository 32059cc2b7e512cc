//! Similar-issue query conversion to Qdrant `Filter`.
//!
//! All three conditions are `must`: same category (keyword), inside the
//! radius (geo), and created at or after the window start (integer range).

use chrono::{DateTime, Utc};
use issue_triage::SimilarIssueQuery;
use qdrant_client::qdrant::{Condition, Filter, GeoPoint as QGeoPoint, GeoRadius, Range};
use tracing::debug;

pub const CATEGORY_FIELD: &str = "category";
pub const LOCATION_FIELD: &str = "location";
pub const CREATED_AT_FIELD: &str = "created_at_ts";

/// Converts a [`SimilarIssueQuery`] to a Qdrant [`Filter`], anchored at `now`.
pub fn to_qdrant_filter(q: &SimilarIssueQuery, now: DateTime<Utc>) -> Filter {
    let since_ts = window_start(q, now).timestamp();
    debug!(
        category = %q.category,
        radius_m = q.max_distance_meters,
        since_ts,
        "filters::to_qdrant_filter"
    );

    Filter::must([
        Condition::matches(CATEGORY_FIELD, q.category.clone()),
        Condition::geo_radius(
            LOCATION_FIELD,
            GeoRadius {
                center: Some(QGeoPoint {
                    lon: q.point.lon,
                    lat: q.point.lat,
                }),
                radius: q.max_distance_meters as f32,
            },
        ),
        Condition::range(
            CREATED_AT_FIELD,
            Range {
                gte: Some(since_ts as f64),
                ..Default::default()
            },
        ),
    ])
}

/// Oldest creation time still inside the query window.
pub fn window_start(q: &SimilarIssueQuery, now: DateTime<Utc>) -> DateTime<Utc> {
    cutoff(q.since, now)
}

/// `now - span`, saturating at the earliest representable instant.
pub(crate) fn cutoff(span: std::time::Duration, now: DateTime<Utc>) -> DateTime<Utc> {
    chrono::Duration::from_std(span)
        .ok()
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use issue_triage::GeoPoint;
    use qdrant_client::qdrant::condition::ConditionOneOf;

    #[test]
    fn builds_three_must_conditions() {
        let q = SimilarIssueQuery::new("Roads", GeoPoint::new(77.59, 12.97));
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let f = to_qdrant_filter(&q, now);
        assert_eq!(f.must.len(), 3);

        let keys: Vec<String> = f
            .must
            .iter()
            .filter_map(|c| match &c.condition_one_of {
                Some(ConditionOneOf::Field(fc)) => Some(fc.key.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec!["category", "location", "created_at_ts"]);

        let Some(ConditionOneOf::Field(geo)) = &f.must[1].condition_one_of else {
            panic!("geo condition missing");
        };
        let radius = geo.geo_radius.as_ref().unwrap();
        assert_eq!(radius.radius, 5_000.0);
        assert_eq!(radius.center.as_ref().unwrap().lon, 77.59);

        let Some(ConditionOneOf::Field(range)) = &f.must[2].condition_one_of else {
            panic!("range condition missing");
        };
        let expected = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap().timestamp();
        assert_eq!(range.range.as_ref().unwrap().gte, Some(expected as f64));
    }

    #[test]
    fn huge_window_saturates() {
        let mut q = SimilarIssueQuery::new("Roads", GeoPoint::new(0.0, 0.0));
        q.since = std::time::Duration::MAX;
        assert_eq!(window_start(&q, Utc::now()), DateTime::<Utc>::MIN_UTC);
    }
}
