use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::cosmic_client::CosmicClient;
use crate::domain::content::ContentKind;
use crate::record_store::RecordStore;
use crate::routes::ApiError;

#[tracing::instrument(name = "List website content handler", skip(cosmic_client))]
pub async fn handle_list_content(
    kind: web::Path<String>,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let kind = ContentKind::parse(&kind).map_err(|err| {
        tracing::error!("Unknown content kind: {}", err);
        ApiError::NotFound("Content type not found")
    })?;

    let objects = cosmic_client
        .find(kind.object_type(), json!({}))
        .await
        .map_err(ApiError::unexpected("Failed to fetch content"))?;

    Ok(HttpResponse::Ok().json(json!({ "objects": kind.arrange(objects) })))
}
