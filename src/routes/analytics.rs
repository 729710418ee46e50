use actix_web::http::header::USER_AGENT;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::cosmic_client::CosmicClient;
use crate::domain::analytics_event::{
    AnalyticsStats, NewAnalyticsEvent, TrackEventBody, ANALYTICS_EVENT_OBJECT_TYPE,
};
use crate::record_store::RecordStore;
use crate::routes::ApiError;

#[tracing::instrument(
    name = "Track an analytics event handler",
    skip(body, req, cosmic_client),
    fields(event_type = %body.event_type)
)]
pub async fn handle_track_event(
    body: web::Json<TrackEventBody>,
    req: HttpRequest,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let event = NewAnalyticsEvent::parse(body.into_inner(), user_agent)
        .map_err(ApiError::ValidationError)?;

    cosmic_client
        .insert_one(event.into_object(Utc::now()))
        .await
        .map_err(ApiError::unexpected("Failed to track event"))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[tracing::instrument(name = "Analytics stats handler", skip(cosmic_client))]
pub async fn handle_analytics_stats(
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let events = cosmic_client
        .find(ANALYTICS_EVENT_OBJECT_TYPE, json!({}))
        .await
        .map_err(ApiError::unexpected("Failed to fetch stats"))?;

    Ok(HttpResponse::Ok().json(AnalyticsStats::from_events(&events)))
}
