use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use std::time;

use crate::config::NewsletterSettings;
use crate::domain::new_subscriber::NewSubscriber;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Notifies an external service (eg: an email service provider) about new subscriptions.
/// Without a configured url every notification is a no-op.
pub struct WebhookClient {
    http_client: Client,
    url: Option<String>,
}

#[derive(serde::Serialize)]
struct SubscriptionEventBody<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    timestamp: String,
}

impl WebhookClient {
    pub fn new(
        url: Option<String>,
        timeout: Option<time::Duration>,
    ) -> Result<WebhookClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(WebhookClient { http_client, url })
    }

    pub fn from_settings(settings: &NewsletterSettings) -> Result<WebhookClient, reqwest::Error> {
        Self::new(settings.webhook_url.clone(), Some(settings.get_timeout()))
    }

    #[tracing::instrument(
        name = "Notify the subscription webhook",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    pub async fn notify_subscription(
        &self,
        new_subscriber: &NewSubscriber,
    ) -> Result<(), reqwest::Error> {
        let url = match &self.url {
            Some(url) => url,
            None => return Ok(()),
        };
        let body = SubscriptionEventBody {
            email: new_subscriber.email.as_ref(),
            source: new_subscriber.source.as_deref(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        self.http_client
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }
}
