use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::cosmic_client::CosmicClient;
use crate::domain::contact_submission::{ContactBody, NewContactSubmission};
use crate::record_store::RecordStore;
use crate::routes::ApiError;

#[tracing::instrument(
    name = "Submit the contact form handler",
    skip(body, cosmic_client),
    fields(contact_email = %body.email)
)]
pub async fn handle_contact(
    body: web::Json<ContactBody>,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let submission: NewContactSubmission = body
        .into_inner()
        .try_into()
        .map_err(ApiError::ValidationError)?;

    let object = cosmic_client
        .insert_one(submission.into_object(Utc::now().date_naive()))
        .await
        .map_err(ApiError::unexpected("Failed to submit contact form"))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Contact form submitted successfully",
        "id": object.id,
    })))
}
