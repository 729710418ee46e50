use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;

/// A record as returned by the content backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmicObject {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

/// Body of an insert call.
#[derive(Debug, Clone, Serialize)]
pub struct NewObject {
    pub title: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub metadata: Value,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to reach the content backend.")]
    RequestError(#[from] reqwest::Error),
    #[error("Content backend record {id} is malformed: {reason}")]
    MalformedRecord { id: String, reason: String },
}

impl CosmicObject {
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn metadata_bool(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Numeric `order` used to sort marketing content. Missing or non-numeric counts as 0.
    pub fn order(&self) -> f64 {
        self.metadata
            .get("order")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn malformed(&self, reason: impl Into<String>) -> StoreError {
        StoreError::MalformedRecord {
            id: self.id.clone(),
            reason: reason.into(),
        }
    }
}

impl NewObject {
    pub fn new(object_type: &str, title: impl Into<String>, metadata: Value) -> Self {
        Self {
            title: title.into(),
            object_type: object_type.to_string(),
            metadata,
        }
    }
}

/// The remote collection of typed records everything in this service is persisted in.
///
/// A "no results" answer from the backend is an empty `Vec`, never an error.
pub trait RecordStore: Send + Sync {
    fn find(
        &self,
        object_type: &str,
        filter: Value,
    ) -> impl Future<Output = Result<Vec<CosmicObject>, StoreError>> + Send;

    fn insert_one(
        &self,
        object: NewObject,
    ) -> impl Future<Output = Result<CosmicObject, StoreError>> + Send;

    /// Merges `metadata` into the metadata of the record `id`.
    fn update_one(
        &self,
        id: &str,
        metadata: Value,
    ) -> impl Future<Output = Result<CosmicObject, StoreError>> + Send;
}
