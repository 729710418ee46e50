use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};
use std::time;

use crate::config::CosmicSettings;
use crate::record_store::{CosmicObject, NewObject, RecordStore, StoreError};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
const OBJECT_PROPS: &str = "id,title,slug,type,metadata,created_at,modified_at";

/// HTTP client of the content backend bucket. Reads are authorized with the read key
/// as query parameter, writes with the write key as bearer token.
#[derive(Clone)]
pub struct CosmicClient {
    http_client: Client,
    base_url: String,
    bucket_slug: String,
    read_key: Secret<String>,
    write_key: Secret<String>,
}

#[derive(serde::Deserialize)]
struct FindResponse {
    #[serde(default)]
    objects: Vec<CosmicObject>,
}

#[derive(serde::Deserialize)]
struct ObjectResponse {
    object: CosmicObject,
}

#[derive(serde::Serialize)]
struct UpdateObjectBody {
    metadata: Value,
}

impl CosmicClient {
    pub fn new(
        base_url: String,
        bucket_slug: String,
        read_key: Secret<String>,
        write_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<CosmicClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(CosmicClient {
            http_client,
            base_url,
            bucket_slug,
            read_key,
            write_key,
        })
    }

    pub fn from_settings(settings: &CosmicSettings) -> Result<CosmicClient, reqwest::Error> {
        Self::new(
            settings.get_base_url(),
            settings.bucket_slug.clone(),
            settings.read_key.clone(),
            settings.write_key.clone(),
            Some(settings.get_timeout()),
        )
    }

    fn objects_url(&self) -> String {
        format!("{}/buckets/{}/objects", self.base_url, self.bucket_slug)
    }
}

impl RecordStore for CosmicClient {
    #[tracing::instrument(name = "Find objects in the content backend", skip(self, filter))]
    async fn find(
        &self,
        object_type: &str,
        filter: Value,
    ) -> Result<Vec<CosmicObject>, StoreError> {
        let query = with_object_type(filter, object_type).to_string();
        let response = self
            .http_client
            .get(self.objects_url())
            .query(&[
                ("read_key", self.read_key.expose_secret().as_str()),
                ("query", query.as_str()),
                ("props", OBJECT_PROPS),
                ("depth", "1"),
            ])
            .send()
            .await?;

        // The backend answers 404 when nothing matches the query
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body: FindResponse = response.error_for_status()?.json().await?;

        Ok(body.objects)
    }

    #[tracing::instrument(
        name = "Insert an object into the content backend",
        skip(self, object),
        fields(object_type = %object.object_type)
    )]
    async fn insert_one(&self, object: NewObject) -> Result<CosmicObject, StoreError> {
        let body: ObjectResponse = self
            .http_client
            .post(self.objects_url())
            .bearer_auth(self.write_key.expose_secret())
            .json(&object)
            .send()
            .await?
            .error_for_status()? // return an error when server response status code is 4xx or 5xx
            .json()
            .await?;

        Ok(body.object)
    }

    #[tracing::instrument(name = "Update an object in the content backend", skip(self, metadata))]
    async fn update_one(&self, id: &str, metadata: Value) -> Result<CosmicObject, StoreError> {
        let url = format!("{}/{}", self.objects_url(), id);
        let body: ObjectResponse = self
            .http_client
            .patch(&url)
            .bearer_auth(self.write_key.expose_secret())
            .json(&UpdateObjectBody { metadata })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.object)
    }
}

// Filters that are not JSON objects are ignored, only the type constraint is kept.
fn with_object_type(filter: Value, object_type: &str) -> Value {
    let mut query = match filter {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    query.insert(
        String::from("type"),
        Value::String(String::from(object_type)),
    );

    Value::Object(query)
}
