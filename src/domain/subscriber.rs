use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::record_store::{CosmicObject, StoreError};

/// Content backend type holding one record per newsletter subscriber.
pub const SUBSCRIBER_OBJECT_TYPE: &str = "newsletter-subscribers";

#[derive(Debug, Clone, serde::Serialize)]
pub struct Subscriber {
    pub id: String,
    pub email: SubscriberEmail,
    pub status: SubscriberStatus,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

impl TryFrom<&CosmicObject> for Subscriber {
    type Error = StoreError;

    fn try_from(object: &CosmicObject) -> Result<Self, Self::Error> {
        let email = object
            .metadata_str("email")
            .ok_or_else(|| object.malformed("missing email"))
            .and_then(|email| {
                SubscriberEmail::parse(email.to_string()).map_err(|err| object.malformed(err))
            })?;
        let status = object
            .metadata_str("status")
            .ok_or_else(|| object.malformed("missing status"))
            .and_then(|status| {
                SubscriberStatus::parse(status).map_err(|err| object.malformed(err))
            })?;
        let subscribed_at = object
            .metadata_str("subscribed_at")
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.with_timezone(&Utc));

        Ok(Subscriber {
            id: object.id.clone(),
            email,
            status,
            subscribed_at,
            source: object.metadata_str("source").map(String::from),
        })
    }
}
