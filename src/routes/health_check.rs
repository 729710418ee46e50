use actix_web::HttpResponse;

/// Liveness probe. Answers without touching the content backend.
#[tracing::instrument(name = "Health check handler")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
