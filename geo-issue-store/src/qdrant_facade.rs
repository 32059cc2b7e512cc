//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! Issues are stored as points with a constant 1-dim vector; all querying
//! goes through payload indexes (geo, keyword, integer) via `scroll`.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType, Filter,
    PointStruct, ScrollPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use qdrant_client::Payload;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GeoStoreConfig;
use crate::errors::StoreError;
use crate::filters::{CATEGORY_FIELD, CREATED_AT_FIELD, LOCATION_FIELD};
use crate::record::IssueRecord;

/// Placeholder vector; the collection is only queried by payload.
const UNIT_VECTOR_SIZE: u64 = 1;

/// A facade over the Qdrant client to keep the rest of the code clean and stable.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    pub fn new(cfg: &GeoStoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates the collection and its payload indexes when missing.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it, then indexes `location` (geo),
    ///   `category` (keyword) and `created_at_ts` (integer).
    pub async fn ensure_collection(&self) -> Result<(), StoreError> {
        let exists = self
            .client
            .collection_exists(self.collection.clone())
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;
        if exists {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        warn!(collection = %self.collection, "collection not found, creating");
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(UNIT_VECTOR_SIZE, Distance::Dot)),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        for (field, kind) in [
            (LOCATION_FIELD, FieldType::Geo),
            (CATEGORY_FIELD, FieldType::Keyword),
            (CREATED_AT_FIELD, FieldType::Integer),
        ] {
            self.client
                .create_field_index(
                    CreateFieldIndexCollectionBuilder::new(&self.collection, field, kind).wait(true),
                )
                .await
                .map_err(|e| StoreError::Qdrant(e.to_string()))?;
            debug!(collection = %self.collection, field, "payload index created");
        }

        info!(collection = %self.collection, "collection created with payload indexes");
        Ok(())
    }

    /// Upserts one issue. Point ids are UUIDv5 of the issue id, so
    /// re-recording the same issue overwrites it.
    pub async fn upsert_issue(&self, record: &IssueRecord) -> Result<(), StoreError> {
        let payload = Payload::try_from(record.to_payload_json())
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;
        let point = PointStruct::new(
            stable_point_id(&record.id).to_string(),
            vec![1.0_f32],
            payload,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        debug!(collection = %self.collection, issue_id = %record.id, "issue upserted");
        Ok(())
    }

    /// Returns up to `limit` payloads matching `filter`, as JSON.
    pub async fn scroll(&self, filter: Filter, limit: u32) -> Result<Vec<Value>, StoreError> {
        let res = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .filter(filter)
                    .limit(limit)
                    .with_payload(true)
                    .with_vectors(false),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let out: Vec<Value> = res
            .result
            .into_iter()
            .map(|p| qpayload_to_json(p.payload))
            .collect();
        debug!(collection = %self.collection, hits = out.len(), "scroll completed");
        Ok(out)
    }
}

/// Deterministic UUIDv5 from an issue id.
pub fn stable_point_id(issue_id: &str) -> uuid::Uuid {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_URL, issue_id.as_bytes())
}

/// Converts a Qdrant payload into JSON, including nested structs and lists.
fn qpayload_to_json(p: HashMap<String, QValue>) -> Value {
    Value::Object(p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect())
}

fn qvalue_to_json(v: QValue) -> Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => Value::String(s),
        Some(K::IntegerValue(i)) => Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        Some(K::BoolValue(b)) => Value::Bool(b),
        Some(K::StructValue(s)) => qpayload_to_json(s.fields),
        Some(K::ListValue(l)) => Value::Array(l.values.into_iter().map(qvalue_to_json).collect()),
        Some(K::NullValue(_)) | None => Value::Null,
    }
}
