use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::{Subscriber, SUBSCRIBER_OBJECT_TYPE};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::keyed_lock::KeyedLocks;
use crate::record_store::{NewObject, RecordStore, StoreError};

pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    Resubscribed,
    AlreadySubscribed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    Unsubscribed,
    NotFound,
    Failed,
}

impl SubscribeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SubscribeOutcome::Subscribed | SubscribeOutcome::Resubscribed
        )
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, SubscribeOutcome::AlreadySubscribed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SubscribeOutcome::Failed)
    }

    pub fn message(&self) -> &'static str {
        match self {
            SubscribeOutcome::Subscribed => "Successfully subscribed to the newsletter!",
            SubscribeOutcome::Resubscribed => "Welcome back! You have been resubscribed.",
            SubscribeOutcome::AlreadySubscribed => {
                "This email is already subscribed to our newsletter."
            }
            SubscribeOutcome::Failed => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl UnsubscribeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UnsubscribeOutcome::Unsubscribed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UnsubscribeOutcome::Failed)
    }

    pub fn message(&self) -> &'static str {
        match self {
            UnsubscribeOutcome::Unsubscribed => {
                "You have been successfully unsubscribed from our newsletter."
            }
            UnsubscribeOutcome::NotFound => "Email address not found in our subscriber list.",
            UnsubscribeOutcome::Failed => GENERIC_FAILURE_MESSAGE,
        }
    }
}

/// Decides the next state of a newsletter subscription and persists it.
///
/// Holds no subscriber state between calls. Every call performs exactly one lookup and at
/// most one write, serialized per email address so that at most one record exists per address.
pub struct SubscriptionManager<S> {
    store: S,
    locks: KeyedLocks,
}

impl<S: RecordStore> SubscriptionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
        }
    }

    #[tracing::instrument(
        name = "Subscribe to the newsletter",
        skip(self, new_subscriber),
        fields(
            subscriber_email = %new_subscriber.email,
            source = ?new_subscriber.source
        )
    )]
    pub async fn subscribe(&self, new_subscriber: &NewSubscriber) -> SubscribeOutcome {
        let _guard = self.locks.lock(new_subscriber.email.as_ref()).await;

        match self.try_subscribe(new_subscriber).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(
                    "Failed to subscribe {}: {:?}",
                    new_subscriber.email.as_ref(),
                    err
                );
                SubscribeOutcome::Failed
            }
        }
    }

    #[tracing::instrument(
        name = "Unsubscribe from the newsletter",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn unsubscribe(&self, email: &SubscriberEmail) -> UnsubscribeOutcome {
        let _guard = self.locks.lock(email.as_ref()).await;

        match self.try_unsubscribe(email).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Failed to unsubscribe {}: {:?}", email.as_ref(), err);
                UnsubscribeOutcome::Failed
            }
        }
    }

    async fn try_subscribe(
        &self,
        new_subscriber: &NewSubscriber,
    ) -> Result<SubscribeOutcome, StoreError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        match self.find_subscriber(&new_subscriber.email).await? {
            None => {
                let mut metadata = json!({
                    "email": new_subscriber.email.as_ref(),
                    "status": "subscribed",
                    "subscribed_at": now,
                });

                if let Some(source) = &new_subscriber.source {
                    metadata["source"] = json!(source);
                }

                self.store
                    .insert_one(NewObject::new(
                        SUBSCRIBER_OBJECT_TYPE,
                        new_subscriber.email.as_ref(),
                        metadata,
                    ))
                    .await?;

                Ok(SubscribeOutcome::Subscribed)
            }
            Some(subscriber) if subscriber.status.is_subscribed() => {
                Ok(SubscribeOutcome::AlreadySubscribed)
            }
            // The source of the first signup is kept
            Some(subscriber) => {
                self.store
                    .update_one(
                        &subscriber.id,
                        json!({ "status": "subscribed", "subscribed_at": now }),
                    )
                    .await?;

                Ok(SubscribeOutcome::Resubscribed)
            }
        }
    }

    async fn try_unsubscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<UnsubscribeOutcome, StoreError> {
        let subscriber = match self.find_subscriber(email).await? {
            Some(subscriber) => subscriber,
            None => return Ok(UnsubscribeOutcome::NotFound),
        };

        self.store
            .update_one(&subscriber.id, json!({ "status": "unsubscribed" }))
            .await?;

        Ok(UnsubscribeOutcome::Unsubscribed)
    }

    #[tracing::instrument(name = "Find a newsletter subscriber", skip(self, email))]
    async fn find_subscriber(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let records = self
            .store
            .find(
                SUBSCRIBER_OBJECT_TYPE,
                json!({ "metadata.email": email.as_ref() }),
            )
            .await?;

        records.first().map(Subscriber::try_from).transpose()
    }
}
