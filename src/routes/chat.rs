use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::cosmic_client::CosmicClient;
use crate::domain::chat_message::{ChatBody, NewChatMessage};
use crate::record_store::RecordStore;
use crate::routes::ApiError;

#[tracing::instrument(
    name = "Store a chat message handler",
    skip(body, cosmic_client),
    fields(message_type = %body.message_type)
)]
pub async fn handle_chat_message(
    body: web::Json<ChatBody>,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let chat_message: NewChatMessage = body
        .into_inner()
        .try_into()
        .map_err(ApiError::ValidationError)?;

    let object = cosmic_client
        .insert_one(chat_message.into_object(Utc::now().date_naive()))
        .await
        .map_err(ApiError::unexpected("Failed to store chat message"))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Chat message stored successfully",
        "id": object.id,
    })))
}
