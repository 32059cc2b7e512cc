//! Geo-indexed civic issue store.
//!
//! Records submitted issues and answers "same category, nearby, recent"
//! lookups for the triage engine:
//! - [`GeoIssueStore`]: Qdrant collection with geo/keyword/integer payload indexes
//! - [`InMemoryIssueStore`]: haversine scan, nearest first
//! - [`IssueStore`]: either of the above, chosen at startup

mod config;
mod errors;
mod filters;
mod memory;
mod qdrant_facade;
mod record;

pub use config::{DEFAULT_COLLECTION, GeoStoreConfig};
pub use errors::StoreError;
pub use memory::{InMemoryIssueStore, haversine_meters};
pub use record::{GeoJsonKind, GeoJsonPoint, IssueRecord};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use issue_triage::{FinderError, SimilarIssueFinder, SimilarIssueQuery, SimilarIssues};
use tracing::{trace, warn};

/// Qdrant-backed store. Single entry point for application code.
pub struct GeoIssueStore {
    cfg: GeoStoreConfig,
    client: qdrant_facade::QdrantFacade,
}

impl GeoIssueStore {
    /// # Errors
    /// `StoreError::Config` for invalid settings, `StoreError::Qdrant` if the
    /// client cannot be built. No network I/O happens here.
    pub fn new(cfg: GeoStoreConfig) -> Result<Self, StoreError> {
        trace!("GeoIssueStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &GeoStoreConfig {
        &self.cfg
    }

    /// Creates the collection and payload indexes if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.client.ensure_collection().await
    }

    pub async fn record(&self, record: &IssueRecord) -> Result<(), StoreError> {
        record.validate()?;
        self.client.upsert_issue(record).await
    }

    /// Runs the geo + category + recency filter.
    ///
    /// Qdrant returns filter matches unordered; the count is what triage uses.
    pub async fn find_similar_records(
        &self,
        query: &SimilarIssueQuery,
    ) -> Result<Vec<IssueRecord>, StoreError> {
        let filter = filters::to_qdrant_filter(query, Utc::now());
        let payloads = self.client.scroll(filter, query.limit).await?;

        let mut out = Vec::with_capacity(payloads.len());
        for p in &payloads {
            match IssueRecord::from_payload_json(p) {
                Ok(r) => out.push(r),
                Err(e) => warn!(collection = %self.client.collection(), error = %e, "skipping unreadable point"),
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl SimilarIssueFinder for GeoIssueStore {
    async fn find_similar(&self, query: &SimilarIssueQuery) -> Result<SimilarIssues, FinderError> {
        let records = self.find_similar_records(query).await?;
        Ok(SimilarIssues::from_ids(
            records.into_iter().map(|r| r.id).collect(),
        ))
    }
}

#[async_trait]
impl SimilarIssueFinder for InMemoryIssueStore {
    async fn find_similar(&self, query: &SimilarIssueQuery) -> Result<SimilarIssues, FinderError> {
        Ok(self.find_similar_at(query, Utc::now()).await)
    }
}

/// The store selected at startup.
#[derive(Clone)]
pub enum IssueStore {
    Qdrant(Arc<GeoIssueStore>),
    Memory(Arc<InMemoryIssueStore>),
}

impl IssueStore {
    /// Qdrant when configured, otherwise in-memory keeping `retention` of history.
    pub fn from_config(
        cfg: Option<GeoStoreConfig>,
        retention: std::time::Duration,
    ) -> Result<Self, StoreError> {
        Ok(match cfg {
            Some(cfg) => IssueStore::Qdrant(Arc::new(GeoIssueStore::new(cfg)?)),
            None => IssueStore::Memory(Arc::new(InMemoryIssueStore::with_retention(retention))),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IssueStore::Qdrant(_) => "qdrant",
            IssueStore::Memory(_) => "memory",
        }
    }

    /// Handle for the triage engine.
    pub fn finder(&self) -> Arc<dyn SimilarIssueFinder> {
        match self {
            IssueStore::Qdrant(s) => s.clone(),
            IssueStore::Memory(s) => s.clone(),
        }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        match self {
            IssueStore::Qdrant(s) => s.ensure_schema().await,
            IssueStore::Memory(_) => Ok(()),
        }
    }

    pub async fn record(&self, record: IssueRecord) -> Result<(), StoreError> {
        match self {
            IssueStore::Qdrant(s) => s.record(&record).await,
            IssueStore::Memory(s) => s.record(record).await,
        }
    }
}
