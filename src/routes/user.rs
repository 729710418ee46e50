use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::authentication::AuthenticatedUser;
use crate::cosmic_client::CosmicClient;
use crate::domain::user::{ProfileUpdate, ProfileUpdateBody, User};
use crate::keyed_lock::KeyedLocks;
use crate::record_store::RecordStore;
use crate::routes::ApiError;
use crate::users::find_user_by_id;

const POST_OBJECT_TYPE: &str = "posts";

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BookmarkBody {
    pub post_id: Option<String>,
}

impl BookmarkBody {
    fn into_post_id(self) -> Result<String, ApiError> {
        self.post_id
            .filter(|post_id| !post_id.is_empty())
            .ok_or_else(|| ApiError::ValidationError(String::from("Post ID is required")))
    }
}

async fn get_user(
    cosmic_client: &CosmicClient,
    user_id: &str,
    failure_message: &'static str,
) -> Result<User, ApiError> {
    find_user_by_id(cosmic_client, user_id)
        .await
        .map_err(ApiError::unexpected(failure_message))?
        .ok_or(ApiError::NotFound("User not found"))
}

#[tracing::instrument(
    name = "Get user profile handler",
    skip(user, cosmic_client),
    fields(user_id = %user.user_id)
)]
pub async fn handle_get_profile(
    user: AuthenticatedUser,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let user = get_user(&cosmic_client, &user.user_id, "Failed to fetch profile").await?;

    Ok(HttpResponse::Ok().json(json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "profile_photo": user.profile_photo,
        "newsletter_subscribed": user.newsletter_subscribed,
        "email_verified": user.email_verified,
    })))
}

#[tracing::instrument(
    name = "Update user profile handler",
    skip(user, body, cosmic_client),
    fields(user_id = %user.user_id)
)]
pub async fn handle_update_profile(
    user: AuthenticatedUser,
    body: web::Json<ProfileUpdateBody>,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    let update: ProfileUpdate = body
        .into_inner()
        .try_into()
        .map_err(ApiError::ValidationError)?;

    let object = cosmic_client
        .update_one(&user.user_id, update.to_metadata())
        .await
        .map_err(ApiError::unexpected("Failed to update profile"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully",
        "user": {
            "id": object.id,
            "email": object.metadata.get("email"),
            "name": object.metadata.get("name"),
            "newsletter_subscribed": object.metadata.get("newsletter_subscribed"),
        }
    })))
}

#[tracing::instrument(
    name = "Get user bookmarks handler",
    skip(user, cosmic_client),
    fields(user_id = %user.user_id)
)]
pub async fn handle_get_bookmarks(
    user: AuthenticatedUser,
    cosmic_client: web::Data<CosmicClient>,
) -> Result<HttpResponse, ApiError> {
    const FAILURE_MESSAGE: &str = "Failed to fetch bookmarks";

    let user = get_user(&cosmic_client, &user.user_id, FAILURE_MESSAGE).await?;

    if user.bookmarks.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({ "bookmarks": [] })));
    }

    let posts = cosmic_client
        .find(
            POST_OBJECT_TYPE,
            json!({ "id": { "$in": user.bookmarks.post_ids() } }),
        )
        .await
        .map_err(ApiError::unexpected(FAILURE_MESSAGE))?;

    Ok(HttpResponse::Ok().json(json!({ "bookmarks": posts })))
}

#[tracing::instrument(
    name = "Add a bookmark handler",
    skip(user, body, cosmic_client, locks),
    fields(user_id = %user.user_id)
)]
pub async fn handle_add_bookmark(
    user: AuthenticatedUser,
    body: web::Json<BookmarkBody>,
    cosmic_client: web::Data<CosmicClient>,
    locks: web::Data<KeyedLocks>,
) -> Result<HttpResponse, ApiError> {
    const FAILURE_MESSAGE: &str = "Failed to add bookmark";

    let post_id = body.into_inner().into_post_id()?;
    let _guard = locks.lock(&format!("user:{}", user.user_id)).await;
    let mut user = get_user(&cosmic_client, &user.user_id, FAILURE_MESSAGE).await?;

    if !user.bookmarks.add(&post_id) {
        return Err(ApiError::ValidationError(String::from(
            "Post already bookmarked",
        )));
    }

    cosmic_client
        .update_one(&user.id, user.bookmarks.to_metadata())
        .await
        .map_err(ApiError::unexpected(FAILURE_MESSAGE))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Bookmark added successfully" })))
}

#[tracing::instrument(
    name = "Remove a bookmark handler",
    skip(user, body, cosmic_client, locks),
    fields(user_id = %user.user_id)
)]
pub async fn handle_remove_bookmark(
    user: AuthenticatedUser,
    body: web::Json<BookmarkBody>,
    cosmic_client: web::Data<CosmicClient>,
    locks: web::Data<KeyedLocks>,
) -> Result<HttpResponse, ApiError> {
    const FAILURE_MESSAGE: &str = "Failed to remove bookmark";

    let post_id = body.into_inner().into_post_id()?;
    let _guard = locks.lock(&format!("user:{}", user.user_id)).await;
    let mut user = get_user(&cosmic_client, &user.user_id, FAILURE_MESSAGE).await?;

    user.bookmarks.remove(&post_id);

    cosmic_client
        .update_one(&user.id, user.bookmarks.to_metadata())
        .await
        .map_err(ApiError::unexpected(FAILURE_MESSAGE))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Bookmark removed successfully" })))
}
