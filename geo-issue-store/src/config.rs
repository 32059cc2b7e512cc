//! Store configuration.

use crate::errors::StoreError;

pub const DEFAULT_COLLECTION: &str = "civic_issues";

/// Connection settings for the Qdrant-backed store.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoStoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
}

impl GeoStoreConfig {
    pub fn new(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY` and `QDRANT_COLLECTION`.
    ///
    /// `Ok(None)` when `QDRANT_URL` is unset: the deployment runs without a
    /// persistent store.
    pub fn from_env() -> Result<Option<Self>, StoreError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, StoreError> {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(url) = get("QDRANT_URL") else {
            return Ok(None);
        };
        let cfg = Self {
            qdrant_url: url,
            qdrant_api_key: get("QDRANT_API_KEY"),
            collection: get("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.into()),
        };
        cfg.validate()?;
        Ok(Some(cfg))
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        let url = self.qdrant_url.trim();
        if url.is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StoreError::Config(
                "qdrant_url must start with http:// or https://".into(),
            ));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        Ok(())
    }
}
