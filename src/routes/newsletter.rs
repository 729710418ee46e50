use actix_web::error::InternalError;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::cosmic_client::CosmicClient;
use crate::domain::new_subscriber::{NewSubscriber, SubscribeBody, UnsubscribeBody};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::subscription_manager::SubscriptionManager;
use crate::webhook_client::WebhookClient;

const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address";

#[derive(Serialize)]
struct SubscriptionResponse<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<SubscriptionData<'a>>,
}

#[derive(Serialize)]
struct SubscriptionData<'a> {
    email: &'a str,
}

impl<'a> SubscriptionResponse<'a> {
    fn rejected(message: &'a str) -> Self {
        Self {
            success: false,
            message,
            duplicate: false,
            data: None,
        }
    }
}

/// Bodies the newsletter handlers cannot deserialize (eg: a non-string `email`) are
/// answered like any other invalid address.
pub fn newsletter_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::error!("Invalid newsletter payload: {:?}", err);
        let response =
            HttpResponse::BadRequest().json(SubscriptionResponse::rejected(INVALID_EMAIL_MESSAGE));

        InternalError::from_response(err, response).into()
    })
}

#[tracing::instrument(
    name = "Subscribe to the newsletter handler",
    skip(body, subscription_manager, webhook_client),
    fields(
        subscriber_email = %body.email,
        source = ?body.source
    )
)]
pub async fn handle_subscribe(
    body: web::Json<SubscribeBody>,
    subscription_manager: web::Data<SubscriptionManager<CosmicClient>>,
    webhook_client: web::Data<WebhookClient>,
) -> impl Responder {
    let new_subscriber: NewSubscriber = match body.into_inner().try_into() {
        Ok(subscriber) => subscriber,
        Err(err) => {
            tracing::error!("Validation error: {:?}", err);
            return HttpResponse::BadRequest()
                .json(SubscriptionResponse::rejected(INVALID_EMAIL_MESSAGE));
        }
    };

    let outcome = subscription_manager.subscribe(&new_subscriber).await;

    if outcome.is_failure() {
        return HttpResponse::InternalServerError()
            .json(SubscriptionResponse::rejected(outcome.message()));
    }

    // A failing webhook never fails the subscription
    if outcome.is_success() {
        if let Err(err) = webhook_client.notify_subscription(&new_subscriber).await {
            tracing::error!(
                "Failed to notify the subscription of {}: {:?}",
                new_subscriber.email.as_ref(),
                err
            );
        }
    }

    HttpResponse::Ok().json(SubscriptionResponse {
        success: outcome.is_success(),
        message: outcome.message(),
        duplicate: outcome.is_duplicate(),
        data: outcome.is_success().then(|| SubscriptionData {
            email: new_subscriber.email.as_ref(),
        }),
    })
}

#[tracing::instrument(
    name = "Unsubscribe from the newsletter handler",
    skip(body, subscription_manager),
    fields(subscriber_email = %body.email)
)]
pub async fn handle_unsubscribe(
    body: web::Json<UnsubscribeBody>,
    subscription_manager: web::Data<SubscriptionManager<CosmicClient>>,
) -> impl Responder {
    let email: SubscriberEmail = match body.into_inner().try_into() {
        Ok(email) => email,
        Err(err) => {
            tracing::error!("Validation error: {:?}", err);
            return HttpResponse::BadRequest()
                .json(SubscriptionResponse::rejected(INVALID_EMAIL_MESSAGE));
        }
    };

    let outcome = subscription_manager.unsubscribe(&email).await;
    let response = SubscriptionResponse {
        success: outcome.is_success(),
        message: outcome.message(),
        duplicate: false,
        data: None,
    };

    if outcome.is_failure() {
        return HttpResponse::InternalServerError().json(response);
    }

    HttpResponse::Ok().json(response)
}
