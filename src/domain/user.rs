use secrecy::Secret;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::bookmarks::Bookmarks;
use crate::domain::email_address::EmailAddress;
use crate::domain::password::Password;
use crate::domain::user_name::UserName;
use crate::record_store::{CosmicObject, NewObject, StoreError};

pub const USER_OBJECT_TYPE: &str = "users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePhoto {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub imgix_url: String,
}

#[derive(Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: Secret<String>,
    pub email_verified: bool,
    pub newsletter_subscribed: bool,
    pub profile_photo: Option<ProfilePhoto>,
    pub bookmarks: Bookmarks,
}

impl TryFrom<&CosmicObject> for User {
    type Error = StoreError;

    fn try_from(object: &CosmicObject) -> Result<Self, Self::Error> {
        let email = object
            .metadata_str("email")
            .ok_or_else(|| object.malformed("missing email"))?;
        let password_hash = object
            .metadata_str("password_hash")
            .ok_or_else(|| object.malformed("missing password hash"))?;
        let profile_photo = object
            .metadata
            .get("profile_photo")
            .filter(|photo| !photo.is_null())
            .and_then(|photo| serde_json::from_value(photo.clone()).ok());

        Ok(User {
            id: object.id.clone(),
            name: object.metadata_str("name").unwrap_or_default().to_string(),
            email: email.to_string(),
            password_hash: Secret::new(password_hash.to_string()),
            email_verified: object.metadata_bool("email_verified"),
            newsletter_subscribed: object.metadata_bool("newsletter_subscribed"),
            profile_photo,
            bookmarks: Bookmarks::from_metadata(object.metadata.get("bookmarked_posts")),
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SignupBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: Password,
}

impl TryFrom<SignupBody> for NewUser {
    type Error = String;

    fn try_from(body: SignupBody) -> Result<Self, Self::Error> {
        let name = UserName::parse(body.name)?;
        let email = EmailAddress::parse(body.email)?;
        let password = Password::parse(Secret::new(body.password))?;

        Ok(NewUser {
            name,
            email,
            password,
        })
    }
}

impl NewUser {
    pub fn to_object(&self, password_hash: &str, verification_token: &str) -> NewObject {
        NewObject::new(
            USER_OBJECT_TYPE,
            self.name.as_ref(),
            json!({
                "name": self.name.as_ref(),
                "email": self.email.as_ref(),
                "password_hash": password_hash,
                "verification_token": verification_token,
                "email_verified": false,
                "newsletter_subscribed": false,
                "bookmarked_posts": [],
            }),
        )
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ProfileUpdateBody {
    pub name: Option<String>,
    pub newsletter_subscribed: Option<bool>,
}

/// Partial update of a user profile. Absent fields are left untouched.
#[derive(Debug)]
pub struct ProfileUpdate {
    pub name: Option<UserName>,
    pub newsletter_subscribed: Option<bool>,
}

impl TryFrom<ProfileUpdateBody> for ProfileUpdate {
    type Error = String;

    fn try_from(body: ProfileUpdateBody) -> Result<Self, Self::Error> {
        let name = body.name.map(UserName::parse).transpose()?;

        Ok(ProfileUpdate {
            name,
            newsletter_subscribed: body.newsletter_subscribed,
        })
    }
}

impl ProfileUpdate {
    pub fn to_metadata(&self) -> Value {
        let mut metadata = Map::new();

        if let Some(name) = &self.name {
            metadata.insert(String::from("name"), json!(name.as_ref()));
        }

        if let Some(newsletter_subscribed) = self.newsletter_subscribed {
            metadata.insert(
                String::from("newsletter_subscribed"),
                json!(newsletter_subscribed),
            );
        }

        Value::Object(metadata)
    }
}
