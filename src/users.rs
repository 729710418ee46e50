use serde_json::json;

use crate::domain::user::{User, USER_OBJECT_TYPE};
use crate::record_store::{RecordStore, StoreError};

#[tracing::instrument(name = "Find a user by email", skip(store))]
pub async fn find_user_by_email<S: RecordStore>(
    store: &S,
    email: &str,
) -> Result<Option<User>, StoreError> {
    let records = store
        .find(USER_OBJECT_TYPE, json!({ "metadata.email": email }))
        .await?;

    records.first().map(User::try_from).transpose()
}

#[tracing::instrument(name = "Find a user by id", skip(store))]
pub async fn find_user_by_id<S: RecordStore>(
    store: &S,
    user_id: &str,
) -> Result<Option<User>, StoreError> {
    let records = store
        .find(USER_OBJECT_TYPE, json!({ "id": user_id }))
        .await?;

    records.first().map(User::try_from).transpose()
}
