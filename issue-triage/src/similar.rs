//! Contract for the spatial duplicate lookup.
//!
//! The engine only issues the query and consumes the count; storage adapters
//! (see the `geo-issue-store` crate) implement [`SimilarIssueFinder`].

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::FinderError;
use crate::model::GeoPoint;

pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 5_000.0;
pub const DEFAULT_SINCE: Duration = Duration::from_secs(30 * 24 * 60 * 60);
pub const DEFAULT_LIMIT: u32 = 10;

/// Same category, within `max_distance_meters` of `point`, created within `since`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarIssueQuery {
    pub category: String,
    pub point: GeoPoint,
    pub max_distance_meters: f64,
    pub since: Duration,
    pub limit: u32,
}

impl SimilarIssueQuery {
    /// Query with the standard radius, window and limit.
    pub fn new(category: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            category: category.into(),
            point,
            max_distance_meters: DEFAULT_MAX_DISTANCE_METERS,
            since: DEFAULT_SINCE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Matches found by a finder. `count` never exceeds the query limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarIssues {
    pub count: u32,
    pub issue_ids: Vec<String>,
}

impl SimilarIssues {
    pub fn from_ids(issue_ids: Vec<String>) -> Self {
        Self {
            count: issue_ids.len() as u32,
            issue_ids,
        }
    }
}

/// Geo-indexed lookup of recent same-category issues.
#[async_trait]
pub trait SimilarIssueFinder: Send + Sync {
    /// # Errors
    /// Any store failure; the engine treats it as "no similar issues".
    async fn find_similar(&self, query: &SimilarIssueQuery) -> Result<SimilarIssues, FinderError>;
}
