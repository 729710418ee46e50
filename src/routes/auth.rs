use actix_web::{web, HttpResponse};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;

use crate::authentication::{
    compute_password_hash, validate_credentials, AuthError, Credentials, SessionKeys,
};
use crate::cosmic_client::CosmicClient;
use crate::domain::user::{NewUser, SignupBody};
use crate::keyed_lock::KeyedLocks;
use crate::record_store::RecordStore;
use crate::routes::ApiError;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::users::find_user_by_email;

const SIGNUP_FAILURE_MESSAGE: &str = "An error occurred during signup";
const LOGIN_FAILURE_MESSAGE: &str = "An error occurred during login";
const VERIFICATION_TOKEN_LENGTH: usize = 13;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[tracing::instrument(
    name = "Sign up a new user handler",
    skip(body, cosmic_client, locks),
    fields(user_email = %body.email)
)]
pub async fn handle_signup(
    body: web::Json<SignupBody>,
    cosmic_client: web::Data<CosmicClient>,
    locks: web::Data<KeyedLocks>,
) -> Result<HttpResponse, ApiError> {
    let new_user: NewUser = body
        .into_inner()
        .try_into()
        .map_err(ApiError::ValidationError)?;

    // Serializes the existence check and the insert of concurrent signups for the same email
    let _guard = locks
        .lock(&format!("signup:{}", new_user.email.as_ref()))
        .await;

    let existing_user = find_user_by_email(cosmic_client.get_ref(), new_user.email.as_ref())
        .await
        .map_err(ApiError::unexpected(SIGNUP_FAILURE_MESSAGE))?;

    if existing_user.is_some() {
        return Err(ApiError::ValidationError(String::from(
            "User with this email already exists",
        )));
    }

    let password = new_user.password.as_secret().clone();
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .map_err(ApiError::unexpected(SIGNUP_FAILURE_MESSAGE))?
        .map_err(ApiError::unexpected(SIGNUP_FAILURE_MESSAGE))?;

    let object = cosmic_client
        .insert_one(new_user.to_object(
            password_hash.expose_secret(),
            &generate_verification_token(),
        ))
        .await
        .map_err(ApiError::unexpected(SIGNUP_FAILURE_MESSAGE))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "user": {
            "id": object.id,
            "email": new_user.email.as_ref(),
            "name": new_user.name.as_ref(),
        }
    })))
}

#[tracing::instrument(
    name = "Log in handler",
    skip(body, cosmic_client, session_keys),
    fields(user_email = %body.email, user_id = tracing::field::Empty)
)]
pub async fn handle_login(
    body: web::Json<LoginBody>,
    cosmic_client: web::Data<CosmicClient>,
    session_keys: web::Data<SessionKeys>,
) -> Result<HttpResponse, ApiError> {
    let LoginBody { email, password } = body.into_inner();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::ValidationError(String::from(
            "Please enter your email and password",
        )));
    }

    let credentials = Credentials {
        email,
        password: Secret::new(password),
    };
    let user = validate_credentials(cosmic_client.get_ref(), credentials)
        .await
        .map_err(|err| match err {
            AuthError::InvalidCredentials(err) => ApiError::AuthenticationError(err),
            AuthError::UnexpectedError(err) => ApiError::unexpected(LOGIN_FAILURE_MESSAGE)(err),
        })?;

    tracing::Span::current().record("user_id", &tracing::field::display(&user.id));

    let token = session_keys
        .issue(&user.id)
        .map_err(ApiError::unexpected(LOGIN_FAILURE_MESSAGE))?;
    let image = user
        .profile_photo
        .as_ref()
        .map(|photo| photo.imgix_url.as_str())
        .filter(|url| !url.is_empty());

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "image": image,
        }
    })))
}

fn generate_verification_token() -> String {
    let mut rng = rand::thread_rng();

    std::iter::repeat_with(|| rng.sample(rand::distributions::Alphanumeric))
        .map(char::from)
        .take(VERIFICATION_TOKEN_LENGTH)
        .collect()
}
