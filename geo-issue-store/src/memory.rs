//! In-process store for tests and deployments without Qdrant.
//!
//! Records older than the retention span are dropped on every insert, so the
//! store holds at most one lookup window of issues.

use std::time::Duration;

use chrono::{DateTime, Utc};
use issue_triage::{DEFAULT_SINCE, GeoPoint, SimilarIssueQuery, SimilarIssues};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::StoreError;
use crate::filters::{cutoff, window_start};
use crate::record::IssueRecord;

/// Mean Earth radius (IUGG), meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in meters.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[derive(Debug)]
pub struct InMemoryIssueStore {
    records: RwLock<Vec<IssueRecord>>,
    retention: Duration,
}

impl Default for InMemoryIssueStore {
    fn default() -> Self {
        Self::with_retention(DEFAULT_SINCE)
    }
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps records for `retention`; should cover the similar-issue window.
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            retention,
        }
    }

    /// Inserts or replaces (by id), then drops expired records.
    pub async fn record(&self, record: IssueRecord) -> Result<(), StoreError> {
        self.record_at(record, Utc::now()).await
    }

    pub async fn record_at(&self, record: IssueRecord, now: DateTime<Utc>) -> Result<(), StoreError> {
        record.validate()?;
        let oldest = cutoff(self.retention, now);
        let mut w = self.records.write().await;
        match w.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => w.push(record),
        }
        let before = w.len();
        w.retain(|r| r.created_at >= oldest);
        if w.len() < before {
            debug!(dropped = before - w.len(), kept = w.len(), "pruned expired issues");
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Matching issues, nearest first, capped at `query.limit`.
    pub async fn find_similar_at(&self, query: &SimilarIssueQuery, now: DateTime<Utc>) -> SimilarIssues {
        let since = window_start(query, now);
        let r = self.records.read().await;

        let mut hits: Vec<(f64, &IssueRecord)> = r
            .iter()
            .filter(|rec| rec.category == query.category && rec.created_at >= since)
            .map(|rec| (haversine_meters(query.point, rec.point()), rec))
            .filter(|(d, _)| *d <= query.max_distance_meters)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.truncate(query.limit as usize);

        debug!(category = %query.category, hits = hits.len(), "in-memory similar lookup");
        SimilarIssues::from_ids(hits.into_iter().map(|(_, rec)| rec.id.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const BANGALORE: GeoPoint = GeoPoint::new(77.5946, 12.9716);

    fn rec(id: &str, category: &str, lon: f64, lat: f64, age_days: i64) -> IssueRecord {
        IssueRecord::new(
            id,
            category,
            "t",
            GeoPoint::new(lon, lat),
            Utc::now() - Duration::days(age_days),
        )
    }

    #[test]
    fn haversine_known_distances() {
        assert_eq!(haversine_meters(BANGALORE, BANGALORE), 0.0);
        // One degree of latitude is ~111.2 km.
        let d = haversine_meters(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 100.0, "{d}");
    }

    #[tokio::test]
    async fn filters_by_category_radius_and_age() {
        let store = InMemoryIssueStore::new();
        store.record(rec("near", "Roads", 77.5950, 12.9720, 1)).await.unwrap();
        store.record(rec("nearer", "Roads", 77.5946, 12.9717, 2)).await.unwrap();
        store.record(rec("far", "Roads", 77.70, 13.10, 1)).await.unwrap();
        store.record(rec("old", "Roads", 77.5946, 12.9716, 45)).await.unwrap();
        store.record(rec("other", "Education", 77.5946, 12.9716, 1)).await.unwrap();

        let q = SimilarIssueQuery::new("Roads", BANGALORE);
        let found = store.find_similar_at(&q, Utc::now()).await;
        assert_eq!(found.count, 2);
        assert_eq!(found.issue_ids, vec!["nearer".to_string(), "near".to_string()]);
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let store = InMemoryIssueStore::new();
        for i in 0..15 {
            store
                .record(rec(&format!("i{i}"), "Roads", 77.5946, 12.9716, 0))
                .await
                .unwrap();
        }
        let q = SimilarIssueQuery::new("Roads", BANGALORE);
        assert_eq!(store.find_similar_at(&q, Utc::now()).await.count, 10);
    }

    #[tokio::test]
    async fn record_replaces_by_id_and_validates() {
        let store = InMemoryIssueStore::new();
        store.record(rec("a", "Roads", 0.0, 0.0, 0)).await.unwrap();
        store.record(rec("a", "Roads", 1.0, 1.0, 0)).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.record(rec("b", "Roads", 0.0, 95.0, 0)).await.is_err());
    }

    #[tokio::test]
    async fn inserts_prune_records_past_retention() {
        let store = InMemoryIssueStore::with_retention(std::time::Duration::from_secs(7 * 86_400));
        store.record(rec("stale", "Roads", 0.0, 0.0, 10)).await.unwrap();
        store.record(rec("recent", "Roads", 0.0, 0.0, 3)).await.unwrap();
        assert_eq!(store.len().await, 1);

        // Ten days on, the recent one has expired too.
        let later = Utc::now() + Duration::days(10);
        store
            .record_at(rec("fresh", "Roads", 0.0, 0.0, -10), later)
            .await
            .unwrap();
        let q = SimilarIssueQuery::new("Roads", GeoPoint::new(0.0, 0.0));
        let found = store.find_similar_at(&q, later).await;
        assert_eq!(found.issue_ids, vec!["fresh".to_string()]);
        assert_eq!(store.len().await, 1);
    }
}
